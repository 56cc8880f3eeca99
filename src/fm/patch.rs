//! DX7 and DX11 voice records.
//!
//! Both layouts share the same 128-byte slot. A DX11 record never populates
//! byte 118, which holds the first character of a DX7 voice name, so a
//! non-zero byte there selects the DX7 layout. The decision is made once, when
//! the record is unpacked into a [`VoiceRecord`].
//!
//! Fields are clamped to their documented ranges while unpacking, so the
//! decoder can trust every value it reads.

// Based on MIT-licensed code (c) 2021 by Emilie Gillet (emilie.o.gillet@gmail.com)

/// Size of a voice slot in bytes.
pub const RECORD_SIZE: usize = 128;

pub const NAME_LENGTH: usize = 10;

const FORMAT_SENTINEL: usize = 118;

const SIX_OP_OPERATOR_SIZE: usize = 17;
const FOUR_OP_OPERATOR_SIZE: usize = 10;

/// Voice family of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// 6-operator DX7 voice.
    SixOp,

    /// 4-operator DX11 voice.
    FourOp,
}

impl Format {
    #[inline]
    pub fn num_operators(self) -> usize {
        match self {
            Format::SixOp => 6,
            Format::FourOp => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope<const NUM_STAGES: usize = 4> {
    pub rate: [u8; NUM_STAGES],
    pub level: [u8; NUM_STAGES],
}

impl<const NUM_STAGES: usize> Default for Envelope<NUM_STAGES> {
    fn default() -> Self {
        Self {
            rate: [0; NUM_STAGES],
            level: [0; NUM_STAGES],
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardScaling {
    pub left_depth: u8,
    pub right_depth: u8,
    pub left_curve: u8,
    pub right_curve: u8,
    pub break_point: u8,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SixOpOperator {
    pub envelope: Envelope,
    pub keyboard_scaling: KeyboardScaling,

    pub rate_scaling: u8,
    pub amp_mod_sensitivity: u8,
    pub velocity_sensitivity: u8,
    pub level: u8,

    pub mode: u8,
    pub coarse: u8,
    pub fine: u8, // x frequency by 1 + 0.01 x fine
    pub detune: u8,
}

impl SixOpOperator {
    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.mode != 0
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ModulationParameters {
    pub delay: u8,
    pub rate: u8,
    pub pitch_mod_depth: u8,
    pub amp_mod_depth: u8,
    pub reset_phase: u8,
    pub waveform: u8,
    pub pitch_mod_sensitivity: u8,
    pub amp_mod_sensitivity: u8,
}

/// DX7 voice. Operators are stored OP6 first.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SixOpPatch {
    pub op: [SixOpOperator; 6],
    pub pitch_envelope: Envelope,
    pub algorithm: u8,
    pub feedback: u8,
    pub reset_phase: u8,
    pub modulations: ModulationParameters,
    pub transpose: u8,
    pub name: [u8; NAME_LENGTH],
}

impl SixOpPatch {
    pub fn unpack(&mut self, data: &[u8; RECORD_SIZE]) {
        for (i, op) in self.op.iter_mut().enumerate() {
            let op_data = &data[(i * SIX_OP_OPERATOR_SIZE)..];

            for (j, (rate, level)) in op
                .envelope
                .rate
                .iter_mut()
                .zip(op.envelope.level.iter_mut())
                .enumerate()
            {
                *rate = u8::min(op_data[j] & 0x7F, 99);
                *level = u8::min(op_data[4 + j] & 0x7F, 99);
            }

            op.keyboard_scaling.break_point = u8::min(op_data[8] & 0x7F, 99);
            op.keyboard_scaling.left_depth = u8::min(op_data[9] & 0x7F, 99);
            op.keyboard_scaling.right_depth = u8::min(op_data[10] & 0x7F, 99);
            op.keyboard_scaling.left_curve = op_data[11] & 0x03;
            op.keyboard_scaling.right_curve = (op_data[11] >> 2) & 0x03;

            op.rate_scaling = op_data[12] & 0x07;
            op.amp_mod_sensitivity = op_data[13] & 0x03;
            op.velocity_sensitivity = (op_data[13] >> 2) & 0x07;
            op.level = u8::min(op_data[14] & 0x7F, 99);
            op.mode = op_data[15] & 0x01;
            op.coarse = (op_data[15] >> 1) & 0x1F;
            op.fine = u8::min(op_data[16] & 0x7F, 99);
            op.detune = u8::min((op_data[12] >> 3) & 0x0F, 14);
        }

        for (j, (rate, level)) in self
            .pitch_envelope
            .rate
            .iter_mut()
            .zip(self.pitch_envelope.level.iter_mut())
            .enumerate()
        {
            *rate = u8::min(data[102 + j] & 0x7F, 99);
            *level = u8::min(data[106 + j] & 0x7F, 99);
        }

        self.algorithm = data[110] & 0x1F;
        self.feedback = data[111] & 0x07;
        self.reset_phase = (data[111] >> 3) & 0x01;

        self.modulations.rate = u8::min(data[112] & 0x7F, 99);
        self.modulations.delay = u8::min(data[113] & 0x7F, 99);
        self.modulations.pitch_mod_depth = u8::min(data[114] & 0x7F, 99);
        self.modulations.amp_mod_depth = u8::min(data[115] & 0x7F, 99);
        self.modulations.reset_phase = data[116] & 0x01;
        self.modulations.waveform = u8::min((data[116] >> 1) & 0x07, 5);
        self.modulations.pitch_mod_sensitivity = (data[116] >> 4) & 0x07;

        self.transpose = u8::min(data[117] & 0x7F, 48);

        unpack_name(&mut self.name, &data[118..]);
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FourOpOperator {
    /// Attack, decay 1, decay 2 and release rates.
    pub rate: [u8; 4],
    pub decay_1_level: u8,
    pub level_scaling: u8,
    pub velocity_sensitivity: u8,
    pub eg_bias_sensitivity: u8,
    pub amp_mod_enable: u8,
    pub level: u8,
    pub frequency: u8,
    pub detune: u8,
    pub rate_scaling: u8,

    pub fixed_range: u8,
    pub fixed: u8,
    pub eg_shift: u8,
    pub fine: u8,
    pub waveform: u8,
}

impl FourOpOperator {
    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.fixed != 0
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ControllerRanges {
    pub foot_volume: u8,
    pub wheel_pitch: u8,
    pub wheel_amplitude: u8,
    pub breath_pitch: u8,
    pub breath_amplitude: u8,
    pub breath_pitch_bias: u8,
    pub breath_eg_bias: u8,
    pub foot_pitch: u8,
    pub foot_amplitude: u8,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PerformanceParameters {
    pub pitch_bend_range: u8,
    pub portamento_mode: u8,
    pub portamento: u8,
    pub sustain: u8,
    pub mono: u8,
    pub chorus: u8,
    pub portamento_time: u8,
    pub reverb_rate: u8,
}

/// DX11 voice. Operators are stored OP4 first.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FourOpPatch {
    pub op: [FourOpOperator; 4],
    pub pitch_envelope: Envelope<3>,
    pub algorithm: u8,
    pub feedback: u8,
    pub modulations: ModulationParameters,
    pub transpose: u8,
    pub performance: PerformanceParameters,
    pub controllers: ControllerRanges,
    pub name: [u8; NAME_LENGTH],
}

impl FourOpPatch {
    pub fn unpack(&mut self, data: &[u8; RECORD_SIZE]) {
        for (i, op) in self.op.iter_mut().enumerate() {
            let op_data = &data[(i * FOUR_OP_OPERATOR_SIZE)..];
            let extension = &data[(73 + i * 2)..];

            for (j, rate) in op.rate.iter_mut().enumerate() {
                *rate = u8::min(op_data[j] & 0x1F, 31);
            }

            op.decay_1_level = u8::min(op_data[4] & 0x0F, 15);
            op.level_scaling = u8::min(op_data[5] & 0x7F, 99);
            op.velocity_sensitivity = op_data[6] & 0x07;
            op.eg_bias_sensitivity = (op_data[6] >> 3) & 0x07;
            op.amp_mod_enable = (op_data[6] >> 6) & 0x01;
            op.level = u8::min(op_data[7] & 0x7F, 99);
            op.frequency = op_data[8] & 0x3F;
            op.detune = u8::min(op_data[9] & 0x07, 6);
            op.rate_scaling = (op_data[9] >> 3) & 0x03;

            op.fixed_range = extension[0] & 0x07;
            op.fixed = (extension[0] >> 3) & 0x01;
            op.eg_shift = (extension[0] >> 4) & 0x03;
            op.fine = extension[1] & 0x0F;
            op.waveform = (extension[1] >> 4) & 0x07;
        }

        self.algorithm = data[40] & 0x07;
        self.feedback = (data[40] >> 3) & 0x07;

        self.modulations.reset_phase = (data[40] >> 6) & 0x01;
        self.modulations.rate = u8::min(data[41] & 0x7F, 99);
        self.modulations.delay = u8::min(data[42] & 0x7F, 99);
        self.modulations.pitch_mod_depth = u8::min(data[43] & 0x7F, 99);
        self.modulations.amp_mod_depth = u8::min(data[44] & 0x7F, 99);
        self.modulations.waveform = data[45] & 0x03;
        self.modulations.amp_mod_sensitivity = (data[45] >> 2) & 0x03;
        self.modulations.pitch_mod_sensitivity = (data[45] >> 4) & 0x07;

        self.transpose = u8::min(data[46] & 0x7F, 48);

        self.performance.pitch_bend_range = u8::min(data[47] & 0x7F, 12);
        self.performance.portamento_mode = data[48] & 0x01;
        self.performance.portamento = (data[48] >> 1) & 0x01;
        self.performance.sustain = (data[48] >> 2) & 0x01;
        self.performance.mono = (data[48] >> 3) & 0x01;
        self.performance.chorus = (data[48] >> 4) & 0x01;
        self.performance.portamento_time = u8::min(data[49] & 0x7F, 99);
        self.performance.reverb_rate = u8::min(data[81] & 0x07, 7);

        self.controllers.foot_volume = u8::min(data[50] & 0x7F, 99);
        self.controllers.wheel_pitch = u8::min(data[51] & 0x7F, 99);
        self.controllers.wheel_amplitude = u8::min(data[52] & 0x7F, 99);
        self.controllers.breath_pitch = u8::min(data[53] & 0x7F, 99);
        self.controllers.breath_amplitude = u8::min(data[54] & 0x7F, 99);
        self.controllers.breath_pitch_bias = u8::min(data[55] & 0x7F, 99);
        self.controllers.breath_eg_bias = u8::min(data[56] & 0x7F, 99);
        self.controllers.foot_pitch = u8::min(data[82] & 0x7F, 99);
        self.controllers.foot_amplitude = u8::min(data[83] & 0x7F, 99);

        unpack_name(&mut self.name, &data[57..]);

        for (j, (rate, level)) in self
            .pitch_envelope
            .rate
            .iter_mut()
            .zip(self.pitch_envelope.level.iter_mut())
            .enumerate()
        {
            *rate = u8::min(data[67 + j] & 0x7F, 99);
            *level = u8::min(data[70 + j] & 0x7F, 99);
        }
    }
}

fn unpack_name(name: &mut [u8; NAME_LENGTH], data: &[u8]) {
    for (c, byte) in name.iter_mut().zip(data.iter()) {
        *c = byte & 0x7F;
    }
}

/// A voice slot, unpacked with the layout selected by its sentinel byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceRecord {
    SixOp(SixOpPatch),
    FourOp(FourOpPatch),
}

impl VoiceRecord {
    pub fn unpack(data: &[u8; RECORD_SIZE]) -> Self {
        if data[FORMAT_SENTINEL] != 0 {
            let mut patch = SixOpPatch::default();
            patch.unpack(data);
            VoiceRecord::SixOp(patch)
        } else {
            let mut patch = FourOpPatch::default();
            patch.unpack(data);
            VoiceRecord::FourOp(patch)
        }
    }

    #[inline]
    pub fn format(&self) -> Format {
        match self {
            VoiceRecord::SixOp(_) => Format::SixOp,
            VoiceRecord::FourOp(_) => Format::FourOp,
        }
    }

    #[inline]
    pub fn name(&self) -> &[u8; NAME_LENGTH] {
        match self {
            VoiceRecord::SixOp(patch) => &patch.name,
            VoiceRecord::FourOp(patch) => &patch.name,
        }
    }

    /// Voice name without trailing padding.
    pub fn name_str(&self) -> &str {
        name_str(self.name())
    }
}

/// Printable part of a raw voice name.
pub fn name_str(name: &[u8]) -> &str {
    // Names are 7-bit ASCII after unpacking.
    core::str::from_utf8(name)
        .unwrap_or("")
        .trim_end_matches(|c: char| c == ' ' || c == '\0')
}

//! RF calibration block.
//!
//! Per-antenna gain and power tables for the two RF paths (A and B), sent with
//! [`opcode::RF`](crate::cmd::opcode::RF). The serialized block is [`RF_LEN`]
//! bytes.

use crate::cmd::{opcode, CommandBuf, CommandError, Opcode, WireCommand};
use crate::conf::schema::{ConfigEntry, Schema};

/// Serialized size of [`RfConfig`].
pub const RF_LEN: usize = 252;

/// RF calibration block. Field order is the wire order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RfConfig {
    pub gain_value_a: [u16; 6],
    pub classic_power_value_a: [u16; 10],
    pub le_power_value_a: [u16; 16],
    pub br_channel_pwr_value_a: [u16; 8],
    pub edr_channel_pwr_value_a: [u16; 8],
    pub le_channel_pwr_value_a: [u16; 8],
    pub gain_value_b: [u16; 6],
    pub classic_power_value_b: [u16; 10],
    pub le_power_value_b: [u16; 16],
    pub br_channel_pwr_value_b: [u16; 8],
    pub edr_channel_pwr_value_b: [u16; 8],
    pub le_channel_pwr_value_b: [u16; 8],
    /// LE power word used when per-channel control is off.
    pub le_fix_powerword: u16,
    pub classic_pc_by_channel: u8,
    pub le_pc_by_channel: u8,
    pub rf_switch_mode: u8,
    pub data_capture_mode: u8,
    pub analog_iq_debug_mode: u8,
    pub rf_common_rfu_b3: u8,
    pub rf_common_rfu_w: [u32; 5],
}

impl RfConfig {
    /// All-zero block, the state bring-up starts from.
    pub const ZEROED: Self = Self {
        gain_value_a: [0; 6],
        classic_power_value_a: [0; 10],
        le_power_value_a: [0; 16],
        br_channel_pwr_value_a: [0; 8],
        edr_channel_pwr_value_a: [0; 8],
        le_channel_pwr_value_a: [0; 8],
        gain_value_b: [0; 6],
        classic_power_value_b: [0; 10],
        le_power_value_b: [0; 16],
        br_channel_pwr_value_b: [0; 8],
        edr_channel_pwr_value_b: [0; 8],
        le_channel_pwr_value_b: [0; 8],
        le_fix_powerword: 0,
        classic_pc_by_channel: 0,
        le_pc_by_channel: 0,
        rf_switch_mode: 0,
        data_capture_mode: 0,
        analog_iq_debug_mode: 0,
        rf_common_rfu_b3: 0,
        rf_common_rfu_w: [0; 5],
    };

    /// Vendor reference calibration for a marlin3 module.
    pub const VENDOR_DEFAULT: Self = Self {
        gain_value_a: [0xE000; 6],
        classic_power_value_a: [
            0x3203, 0x2C03, 0x2603, 0x2003, 0x1A03, 0x1403, 0x0E03, 0x0803, 0x0803, 0x0803,
        ],
        le_power_value_a: [
            0x3703, 0x3703, 0x3703, 0x3703, 0x3603, 0x3503, 0x3403, 0x3303, 0x3203, 0x2C03,
            0x2603, 0x2003, 0x1A03, 0x1403, 0x0E03, 0x1603,
        ],
        br_channel_pwr_value_a: [0x0803; 8],
        edr_channel_pwr_value_a: [0x0803; 8],
        le_channel_pwr_value_a: [0x1603; 8],
        gain_value_b: [0xE000; 6],
        classic_power_value_b: [
            0x5CC4, 0x7C8C, 0x7CBC, 0x9C84, 0x9CAC, 0x9CEC, 0xBC9C, 0xBCCC, 0xBCCC, 0xBCCC,
        ],
        le_power_value_b: [
            0x3703, 0x3703, 0x3703, 0x3703, 0x3703, 0x3703, 0x3703, 0x3703, 0x3603, 0x2F03,
            0x2903, 0x2303, 0x1E03, 0x1903, 0x1303, 0x0D03,
        ],
        br_channel_pwr_value_b: [
            0xBD14, 0xBCEC, 0xBCDC, 0xBCCC, 0xBCCC, 0xBCBC, 0xBCCC, 0xBCCC,
        ],
        edr_channel_pwr_value_b: [
            0xBCEC, 0xBCDC, 0xBCCC, 0xBCBC, 0xBCBC, 0xBCBC, 0xBCBC, 0xBCBC,
        ],
        le_channel_pwr_value_b: [
            0xBC7C, 0x9CDC, 0x9CCC, 0x9CB4, 0x9CCC, 0x9CCC, 0x9CCC, 0x9CBC,
        ],
        le_fix_powerword: 0xBC7C,
        classic_pc_by_channel: 0xFF,
        le_pc_by_channel: 0xFF,
        rf_switch_mode: 0x02,
        data_capture_mode: 0x00,
        analog_iq_debug_mode: 0x00,
        rf_common_rfu_b3: 0x55,
        rf_common_rfu_w: [0x5555_5555; 5],
    };
}

impl Schema for RfConfig {
    const TABLE: &'static [ConfigEntry<Self>] = config_table!(RfConfig {
        "g_GainValue_A" => gain_value_a,
        "g_ClassicPowerValue_A" => classic_power_value_a,
        "g_LEPowerValue_A" => le_power_value_a,
        "g_BRChannelpwrvalue_A" => br_channel_pwr_value_a,
        "g_EDRChannelpwrvalue_A" => edr_channel_pwr_value_a,
        "g_LEChannelpwrvalue_A" => le_channel_pwr_value_a,
        "g_GainValue_B" => gain_value_b,
        "g_ClassicPowerValue_B" => classic_power_value_b,
        "g_LEPowerValue_B" => le_power_value_b,
        "g_BRChannelpwrvalue_B" => br_channel_pwr_value_b,
        "g_EDRChannelpwrvalue_B" => edr_channel_pwr_value_b,
        "g_LEChannelpwrvalue_B" => le_channel_pwr_value_b,
        "LE_fix_powerword" => le_fix_powerword,
        "Classic_pc_by_channel" => classic_pc_by_channel,
        "LE_pc_by_channel" => le_pc_by_channel,
        "RF_switch_mode" => rf_switch_mode,
        "Data_Capture_Mode" => data_capture_mode,
        "Analog_IQ_Debug_Mode" => analog_iq_debug_mode,
        "RF_common_rfu_b3" => rf_common_rfu_b3,
        "RF_common_rfu_w" => rf_common_rfu_w,
    });
}

impl WireCommand for RfConfig {
    const OPCODE: Opcode = opcode::RF;

    fn write_payload(&self, buf: &mut CommandBuf) -> Result<(), CommandError> {
        // Path A, then path B.
        put_fields!(buf, self;
            gain_value_a,
            classic_power_value_a,
            le_power_value_a,
            br_channel_pwr_value_a,
            edr_channel_pwr_value_a,
            le_channel_pwr_value_a,
            gain_value_b,
            classic_power_value_b,
            le_power_value_b,
            br_channel_pwr_value_b,
            edr_channel_pwr_value_b,
            le_channel_pwr_value_b,
        );
        put_fields!(buf, self;
            le_fix_powerword,
            classic_pc_by_channel,
            le_pc_by_channel,
            rf_switch_mode,
            data_capture_mode,
            analog_iq_debug_mode,
            rf_common_rfu_b3,
            rf_common_rfu_w,
        );
        Ok(())
    }
}

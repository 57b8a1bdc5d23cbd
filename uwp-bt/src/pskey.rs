//! Device personality ("pskey") block.
//!
//! Loaded from the first vendor `.ini` file and sent with
//! [`opcode::PSKEY`](crate::cmd::opcode::PSKEY). The serialized block is
//! [`PSKEY_LEN`] bytes.

use crate::cmd::{opcode, CommandBuf, CommandError, Opcode, WireCommand};
use crate::conf::schema::{ConfigEntry, Schema};

/// Serialized size of [`PskeyConfig`].
pub const PSKEY_LEN: usize = 160;

/// Device personality block.
///
/// Field order is the wire order. `*_rfu_*` fields are reserved padding and
/// are sent as loaded.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PskeyConfig {
    /// Class of device.
    pub device_class: u32,
    /// LMP feature mask.
    pub feature_set: [u8; 16],
    /// BD address, in wire (array) order.
    pub device_addr: [u8; 6],
    /// Bluetooth SIG company identifier.
    pub comp_id: u16,
    pub g_sys_uart0_communication_supported: u8,
    pub cp2_log_mode: u8,
    pub log_level: u8,
    pub g_central_or_peripheral: u8,
    pub log_bitmask: u16,
    pub super_ssp_enable: u8,
    pub common_rfu_b3: u8,
    pub common_rfu_w: [u32; 2],
    pub le_rfu_w: [u32; 2],
    pub lmp_rfu_w: [u32; 2],
    pub lc_rfu_w: [u32; 2],
    pub g_wbs_nv_117: u16,
    pub g_wbs_nv_118: u16,
    pub g_nbv_nv_117: u16,
    pub g_nbv_nv_118: u16,
    pub g_sys_sco_transmit_mode: u8,
    pub audio_rfu_b1: u8,
    pub audio_rfu_b2: u8,
    pub audio_rfu_b3: u8,
    pub audio_rfu_w: [u32; 2],
    pub g_sys_sleep_in_standby_supported: u8,
    pub g_sys_sleep_master_supported: u8,
    pub g_sys_sleep_slave_supported: u8,
    pub power_rfu_b1: u8,
    pub power_rfu_w: [u32; 2],
    /// Window extension (µs).
    pub win_ext: u32,
    pub edr_tx_edr_delay: u8,
    pub edr_rx_edr_delay: u8,
    pub tx_delay: u8,
    pub rx_delay: u8,
    pub bb_rfu_w: [u32; 2],
    pub agc_mode: u8,
    pub diff_or_eq: u8,
    pub ramp_mode: u8,
    pub modem_rfu_b1: u8,
    pub modem_rfu_w: [u32; 2],
    pub bqb_bitmask_1: u32,
    pub bqb_bitmask_2: u32,
    /// Coexistence thresholds.
    pub bt_coex_threshold: [u16; 8],
    pub other_rfu_w: [u32; 2],
}

impl PskeyConfig {
    /// All-zero block, the state bring-up starts from.
    pub const ZEROED: Self = Self {
        device_class: 0,
        feature_set: [0; 16],
        device_addr: [0; 6],
        comp_id: 0,
        g_sys_uart0_communication_supported: 0,
        cp2_log_mode: 0,
        log_level: 0,
        g_central_or_peripheral: 0,
        log_bitmask: 0,
        super_ssp_enable: 0,
        common_rfu_b3: 0,
        common_rfu_w: [0; 2],
        le_rfu_w: [0; 2],
        lmp_rfu_w: [0; 2],
        lc_rfu_w: [0; 2],
        g_wbs_nv_117: 0,
        g_wbs_nv_118: 0,
        g_nbv_nv_117: 0,
        g_nbv_nv_118: 0,
        g_sys_sco_transmit_mode: 0,
        audio_rfu_b1: 0,
        audio_rfu_b2: 0,
        audio_rfu_b3: 0,
        audio_rfu_w: [0; 2],
        g_sys_sleep_in_standby_supported: 0,
        g_sys_sleep_master_supported: 0,
        g_sys_sleep_slave_supported: 0,
        power_rfu_b1: 0,
        power_rfu_w: [0; 2],
        win_ext: 0,
        edr_tx_edr_delay: 0,
        edr_rx_edr_delay: 0,
        tx_delay: 0,
        rx_delay: 0,
        bb_rfu_w: [0; 2],
        agc_mode: 0,
        diff_or_eq: 0,
        ramp_mode: 0,
        modem_rfu_b1: 0,
        modem_rfu_w: [0; 2],
        bqb_bitmask_1: 0,
        bqb_bitmask_2: 0,
        bt_coex_threshold: [0; 8],
        other_rfu_w: [0; 2],
    };

    /// Vendor reference values for a marlin3 module.
    pub const VENDOR_DEFAULT: Self = Self {
        device_class: 0x001F00,
        feature_set: [
            0xFF, 0xFF, 0x8D, 0xFE, 0xDB, 0x7D, 0x7B, 0x83, 0xFF, 0xA7, 0xFF, 0x7F, 0x00, 0xE0,
            0xF7, 0x3E,
        ],
        device_addr: [0x88, 0x88, 0x66, 0xDA, 0x45, 0x40],
        comp_id: 0x01EC,
        g_sys_uart0_communication_supported: 1,
        cp2_log_mode: 1,
        log_level: 0xFF,
        g_central_or_peripheral: 0,
        log_bitmask: 0xFFFF,
        g_wbs_nv_117: 0x004D,
        g_wbs_nv_118: 0x0076,
        g_nbv_nv_117: 0x009B,
        g_nbv_nv_118: 0x0A55,
        g_sys_sleep_in_standby_supported: 1,
        g_sys_sleep_master_supported: 1,
        g_sys_sleep_slave_supported: 1,
        win_ext: 40,
        edr_tx_edr_delay: 6,
        edr_rx_edr_delay: 8,
        tx_delay: 12,
        rx_delay: 34,
        bt_coex_threshold: [0x04E2, 0x1F40, 0x0020, 0x00C8, 0x0006, 0x0000, 0x0000, 0x0000],
        ..Self::ZEROED
    };
}

impl Schema for PskeyConfig {
    const TABLE: &'static [ConfigEntry<Self>] = config_table!(PskeyConfig {
        "device_class" => device_class,
        "feature_set" => feature_set,
        "device_addr" => device_addr,
        "comp_id" => comp_id,
        "g_sys_uart0_communication_supported" => g_sys_uart0_communication_supported,
        "cp2_log_mode" => cp2_log_mode,
        "LogLevel" => log_level,
        "g_central_or_perpheral" => g_central_or_peripheral,
        "Log_BitMask" => log_bitmask,
        "super_ssp_enable" => super_ssp_enable,
        "common_rfu_b3" => common_rfu_b3,
        "common_rfu_w" => common_rfu_w,
        "le_rfu_w" => le_rfu_w,
        "lmp_rfu_w" => lmp_rfu_w,
        "lc_rfu_w" => lc_rfu_w,
        "g_wbs_nv_117" => g_wbs_nv_117,
        "g_wbs_nv_118" => g_wbs_nv_118,
        "g_nbv_nv_117" => g_nbv_nv_117,
        "g_nbv_nv_118" => g_nbv_nv_118,
        "g_sys_sco_transmit_mode" => g_sys_sco_transmit_mode,
        "audio_rfu_b1" => audio_rfu_b1,
        "audio_rfu_b2" => audio_rfu_b2,
        "audio_rfu_b3" => audio_rfu_b3,
        "audio_rfu_w" => audio_rfu_w,
        "g_sys_sleep_in_standby_supported" => g_sys_sleep_in_standby_supported,
        "g_sys_sleep_master_supported" => g_sys_sleep_master_supported,
        "g_sys_sleep_slave_supported" => g_sys_sleep_slave_supported,
        "power_rfu_b1" => power_rfu_b1,
        "power_rfu_w" => power_rfu_w,
        "win_ext" => win_ext,
        "edr_tx_edr_delay" => edr_tx_edr_delay,
        "edr_rx_edr_delay" => edr_rx_edr_delay,
        "tx_delay" => tx_delay,
        "rx_delay" => rx_delay,
        "bb_rfu_w" => bb_rfu_w,
        "agc_mode" => agc_mode,
        "diff_or_eq" => diff_or_eq,
        "ramp_mode" => ramp_mode,
        "modem_rfu_b1" => modem_rfu_b1,
        "modem_rfu_w" => modem_rfu_w,
        "BQB_BitMask_1" => bqb_bitmask_1,
        "BQB_BitMask_2" => bqb_bitmask_2,
        "bt_coex_threshold" => bt_coex_threshold,
        "other_rfu_w" => other_rfu_w,
    });
}

impl WireCommand for PskeyConfig {
    const OPCODE: Opcode = opcode::PSKEY;

    fn write_payload(&self, buf: &mut CommandBuf) -> Result<(), CommandError> {
        put_fields!(buf, self;
            device_class,
            feature_set,
            device_addr,
            comp_id,
            g_sys_uart0_communication_supported,
            cp2_log_mode,
            log_level,
            g_central_or_peripheral,
            log_bitmask,
            super_ssp_enable,
            common_rfu_b3,
            common_rfu_w,
            le_rfu_w,
            lmp_rfu_w,
            lc_rfu_w,
            g_wbs_nv_117,
            g_wbs_nv_118,
            g_nbv_nv_117,
            g_nbv_nv_118,
            g_sys_sco_transmit_mode,
            audio_rfu_b1,
            audio_rfu_b2,
            audio_rfu_b3,
            audio_rfu_w,
            g_sys_sleep_in_standby_supported,
            g_sys_sleep_master_supported,
            g_sys_sleep_slave_supported,
            power_rfu_b1,
            power_rfu_w,
            win_ext,
            edr_tx_edr_delay,
            edr_rx_edr_delay,
            tx_delay,
            rx_delay,
            bb_rfu_w,
            agc_mode,
            diff_or_eq,
            ramp_mode,
            modem_rfu_b1,
            modem_rfu_w,
            bqb_bitmask_1,
            bqb_bitmask_2,
            bt_coex_threshold,
            other_rfu_w,
        );
        Ok(())
    }
}

//! The 8-bit dispatch address space.
//!
//! Addresses are assigned when a build of the bridge is configured and
//! are not negotiable at runtime. Two addresses are reserved outside
//! any peripheral: a presence probe and a reset request.

/// Delta-sigma ADC control.
pub const DELSIG_ADC_CONTROL: u8 = 0x01;

/// First SAR ADC control.
pub const SAR_ADC0_CONTROL: u8 = 0x02;

/// Second SAR ADC control.
pub const SAR_ADC1_CONTROL: u8 = 0x03;

/// First voltage DAC control.
pub const VDAC0_CONTROL: u8 = 0x04;

/// Second voltage DAC control.
pub const VDAC1_CONTROL: u8 = 0x05;

/// First current DAC control.
pub const IDAC0_CONTROL: u8 = 0x06;

/// Second current DAC control.
pub const IDAC1_CONTROL: u8 = 0x07;

/// Waveform DAC control.
pub const WAVEDAC_CONTROL: u8 = 0x08;

/// First of twelve PWM blocks; PWM block `n` lives at `PWM_REGISTER0 + n`.
pub const PWM_REGISTER0: u8 = 0x09;

/// Last PWM block address.
pub const PWM_REGISTER11: u8 = 0x14;

/// Sequenced analog input block.
pub const ANALOG_IN_REGISTER: u8 = 0x15;

/// Capacitive-sense block.
pub const CAPSENSE_REGISTER: u8 = 0x16;

/// Masked-register digital GPIO ports.
pub const GPIO_REGISTER: u8 = 0x20;

/// Reserved: presence probe. Always a no-op; hosts use it to confirm a
/// live build is on the other end of the link.
pub const CHECK_BUILD: u8 = 0xFE;

/// Reserved: reset request. A no-op at the dispatch layer; any actual
/// reset behavior belongs to the platform outside the bridge.
pub const RESET_ADDRESS: u8 = 0xFF;

/// Returns a human-readable name for a dispatch address.
pub fn address_name(address: u8) -> &'static str {
    match address {
        DELSIG_ADC_CONTROL => "DELSIG_ADC",
        SAR_ADC0_CONTROL => "SAR_ADC0",
        SAR_ADC1_CONTROL => "SAR_ADC1",
        VDAC0_CONTROL => "VDAC0",
        VDAC1_CONTROL => "VDAC1",
        IDAC0_CONTROL => "IDAC0",
        IDAC1_CONTROL => "IDAC1",
        WAVEDAC_CONTROL => "WAVEDAC",
        PWM_REGISTER0..=PWM_REGISTER11 => "PWM",
        ANALOG_IN_REGISTER => "ANALOG_IN",
        CAPSENSE_REGISTER => "CAPSENSE",
        GPIO_REGISTER => "GPIO",
        CHECK_BUILD => "CHECK_BUILD",
        RESET_ADDRESS => "RESET",
        _ => "UNASSIGNED",
    }
}

/// Returns true for the two addresses reserved outside any peripheral.
pub fn is_reserved(address: u8) -> bool {
    address == CHECK_BUILD || address == RESET_ADDRESS
}

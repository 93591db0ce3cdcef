//! Analog speed bus decoding (FPGA-REQ-30 family).
//!
//! The bus carries 8 thermometer-coded primary lines plus 2 auxiliary
//! lines used only by the 25-km-band check. A valid primary code is a
//! contiguous run of 1s from bit 0; the run length selects the band.

use vcu_common::consts::SPEED_BUS_LINES;
use vcu_common::state::SpeedBand;

/// Bit position of the auxiliary below-25 indicator line.
pub const AUX_BELOW_25_BIT: u16 = 8;
/// Bit position of the auxiliary above-25 indicator line.
pub const AUX_ABOVE_25_BIT: u16 = 9;

/// Decode the primary thermometer code into a speed band.
///
/// All-zero decodes as `UnderRange`, all-ones as `OverRange`; a '0'
/// interspersed between '1's decodes as `Invalid`.
pub fn decode_bus(bus: u16) -> SpeedBand {
    let primary = bus & ((1 << SPEED_BUS_LINES) - 1);
    let run = primary.trailing_ones() as u16;
    if primary != (1 << run) - 1 {
        return SpeedBand::Invalid;
    }
    // run is 0..=8 for a contiguous code; from_u8 cannot fail here.
    SpeedBand::from_u8(run as u8).unwrap_or(SpeedBand::Invalid)
}

/// Evaluate the 25-km-band check over the two auxiliary lines.
///
/// The pair is a redundant below/above-25 indication. The check fires
/// when the lines are internally inconsistent (both set or both clear)
/// or contradict the decoded band. Only meaningful when the primary
/// decode is not `Invalid`.
pub fn band_25km_fault(bus: u16, band: SpeedBand) -> bool {
    if band == SpeedBand::Invalid {
        return false;
    }
    let below = bus & (1 << AUX_BELOW_25_BIT) != 0;
    let above = bus & (1 << AUX_ABOVE_25_BIT) != 0;
    below == above || below != band.below_25()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contiguous_codes_decode_to_bands() {
        assert_eq!(decode_bus(0b0000_0000), SpeedBand::UnderRange);
        assert_eq!(decode_bus(0b0000_0001), SpeedBand::B0To3);
        assert_eq!(decode_bus(0b0000_0011), SpeedBand::B3To23);
        assert_eq!(decode_bus(0b0000_0111), SpeedBand::B23To25);
        assert_eq!(decode_bus(0b0000_1111), SpeedBand::B25To75);
        assert_eq!(decode_bus(0b0001_1111), SpeedBand::B75To90);
        assert_eq!(decode_bus(0b0011_1111), SpeedBand::B90To110);
        assert_eq!(decode_bus(0b0111_1111), SpeedBand::Above110);
        assert_eq!(decode_bus(0b1111_1111), SpeedBand::OverRange);
    }

    #[test]
    fn holes_decode_as_invalid() {
        assert_eq!(decode_bus(0b0000_0101), SpeedBand::Invalid);
        assert_eq!(decode_bus(0b0000_1011), SpeedBand::Invalid);
        assert_eq!(decode_bus(0b1000_0000), SpeedBand::Invalid);
        assert_eq!(decode_bus(0b1011_1111), SpeedBand::Invalid);
    }

    #[test]
    fn aux_lines_ignored_by_primary_decode() {
        assert_eq!(decode_bus(0b11_0000_1111), SpeedBand::B25To75);
    }

    #[test]
    fn aux_pair_consistent_with_band() {
        // Below-25 band, below line set, above clear: no fault.
        let bus = (1 << AUX_BELOW_25_BIT) | 0b0000_0011;
        assert!(!band_25km_fault(bus, decode_bus(bus)));

        // Above-25 band, above line set, below clear: no fault.
        let bus = (1 << AUX_ABOVE_25_BIT) | 0b0001_1111;
        assert!(!band_25km_fault(bus, decode_bus(bus)));
    }

    #[test]
    fn aux_pair_internally_inconsistent() {
        // Both lines clear.
        let bus = 0b0000_0011;
        assert!(band_25km_fault(bus, decode_bus(bus)));

        // Both lines set.
        let bus = (1 << AUX_BELOW_25_BIT) | (1 << AUX_ABOVE_25_BIT) | 0b0000_0011;
        assert!(band_25km_fault(bus, decode_bus(bus)));
    }

    #[test]
    fn aux_pair_contradicts_band() {
        // Band above 25 but aux reports below.
        let bus = (1 << AUX_BELOW_25_BIT) | 0b0011_1111;
        assert!(band_25km_fault(bus, decode_bus(bus)));

        // Band below 25 but aux reports above.
        let bus = (1 << AUX_ABOVE_25_BIT) | 0b0000_0001;
        assert!(band_25km_fault(bus, decode_bus(bus)));
    }

    #[test]
    fn check_suppressed_on_invalid_primary() {
        let bus = 0b0000_0101; // invalid primary, aux both clear
        assert!(!band_25km_fault(bus, decode_bus(bus)));
    }

    #[test]
    fn under_range_counts_as_below_25() {
        let bus = (1 << AUX_BELOW_25_BIT) | 0b0000_0000;
        assert!(!band_25km_fault(bus, decode_bus(bus)));
    }
}

//! Calculation logic for the Tip Pool Engine.
//!
//! This module contains the tip distribution engine: shift clamping and
//! shortfall redistribution, pool-specific rounding, the distribution itself,
//! and the small input and formatting helpers around it.

mod amount_input;
mod formatting;
mod rounding;
mod shift_redistribution;
mod tip_distribution;

pub use amount_input::{INVALID_AMOUNT_MESSAGE, amount_from_cents_input, parse_tip_amount};
pub use formatting::{
    format_calculation_date, format_currency, format_currency_with_symbol, format_shift,
    generate_calculation_id,
};
pub use rounding::{RAW_SHARE_PRECISION, apply_rounding_rule, round_pool_amount};
pub use shift_redistribution::{
    FULL_SHIFT_UNIT, ShortfallRedistribution, clamp_shift, redistribute_shift_shortfall,
};
pub use tip_distribution::calculate_tips;

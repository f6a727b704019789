//! Property tests for curve pricing and payroll arithmetic.

use attenomics::domain::curve::{
    buy, sell, tokens_for_currency, CurveState, SCALE, VIRTUAL_TOKEN_SUPPLY,
};
use attenomics::domain::payroll::{compute_net_pay, is_payment_due, next_due, PaymentFrequency};
use attenomics::domain::{quote_swap, PricingError};
use proptest::prelude::*;

const MAX_SUPPLY: u128 = VIRTUAL_TOKEN_SUPPLY / 2;
const MAX_AMOUNT: u128 = VIRTUAL_TOKEN_SUPPLY / 4;
/// Smallest amount the sell/buy agreement is stated for: 1,000 whole tokens.
const MIN_TRACKED_AMOUNT: u128 = 1_000 * SCALE;
/// Largest amount the sell/buy agreement is stated for: 1% of the ceiling.
const MAX_TRACKED_AMOUNT: u128 = VIRTUAL_TOKEN_SUPPLY / 100;
/// Bound on `amount * initial_price` that keeps reserve growth under 0.2%.
const MAX_PRICE_GROWTH: u128 = 1_000_000_000_000_000;

fn frequency() -> impl Strategy<Value = PaymentFrequency> {
    prop_oneof![
        Just(PaymentFrequency::Weekly),
        Just(PaymentFrequency::BiWeekly),
        Just(PaymentFrequency::Monthly),
    ]
}

proptest! {
    #[test]
    fn every_purchase_costs_something(
        supply in 0..MAX_SUPPLY,
        amount in 1u128..MAX_AMOUNT,
        initial_price in 0u64..1_000_000_000,
    ) {
        let quote = buy(supply, amount, 0, initial_price).unwrap();
        prop_assert!(quote.price_or_proceeds > 0);
        prop_assert_eq!(quote.fee_base_units, 0);
    }

    #[test]
    fn buying_more_never_costs_less(
        supply in 0..MAX_SUPPLY,
        amount in 1u128..MAX_AMOUNT,
        extra in 0u128..MAX_AMOUNT,
        fee in 0u16..=10_000,
    ) {
        let smaller = buy(supply, amount, fee, 0).unwrap();
        let larger = buy(supply, amount + extra, fee, 0).unwrap();
        prop_assert!(smaller.price_or_proceeds <= larger.price_or_proceeds);
    }

    #[test]
    fn buy_fee_only_adds_cost(
        supply in 0..MAX_SUPPLY,
        amount in 1u128..MAX_AMOUNT,
        fee in 0u16..=10_000,
    ) {
        let free = buy(supply, amount, 0, 0).unwrap();
        let charged = buy(supply, amount, fee, 0).unwrap();
        prop_assert_eq!(charged.before_fee(), free.price_or_proceeds);
        if fee > 0 {
            prop_assert!(charged.price_or_proceeds > free.price_or_proceeds);
        } else {
            prop_assert_eq!(charged.price_or_proceeds, free.price_or_proceeds);
        }
    }

    #[test]
    fn raising_the_buy_fee_raises_the_cost(
        supply in 0..MAX_SUPPLY,
        amount in MIN_TRACKED_AMOUNT..MAX_AMOUNT,
        low_fee in 0u16..5_000,
        bump in 1u16..5_000,
    ) {
        let cheap = buy(supply, amount, low_fee, 0).unwrap();
        let dear = buy(supply, amount, low_fee + bump, 0).unwrap();
        prop_assert!(dear.price_or_proceeds > cheap.price_or_proceeds);
    }

    #[test]
    fn selling_back_from_an_empty_curve_tracks_buy_within_one_percent(
        amount in MIN_TRACKED_AMOUNT..=MAX_TRACKED_AMOUNT,
        price_seed in any::<u64>(),
    ) {
        let max_price = MAX_PRICE_GROWTH / amount;
        let initial_price = (u128::from(price_seed) % (max_price + 1)) as u64;

        let cost = buy(0, amount, 0, initial_price).unwrap().price_or_proceeds;
        let proceeds = sell(amount, amount, 0, initial_price).unwrap().price_or_proceeds;

        prop_assert!(cost.abs_diff(proceeds) * 100 <= cost, "cost {} proceeds {}", cost, proceeds);
    }

    #[test]
    fn swap_never_beats_buying_with_the_released_currency(
        source_supply in 1..MAX_SUPPLY,
        sold_percent in 1u128..=100,
        target_supply in 0..MAX_SUPPLY,
        source_price in 0u64..1_000_000_000,
        target_price in 0u64..1_000_000_000,
        source_fee in 0u16..=10_000,
        target_fee in 0u16..=10_000,
    ) {
        let source = CurveState::new(source_supply, source_price, source_fee, source_fee);
        let target = CurveState::new(target_supply, target_price, target_fee, target_fee);
        let amount_in = (source_supply * sold_percent / 100).max(1);

        let quote = quote_swap(&source, &target, amount_in).unwrap();
        let direct = tokens_for_currency(&target, quote.intermediate_base_currency_amount).unwrap();

        prop_assert!(quote.expected_output_amount <= direct);
    }

    #[test]
    fn buying_past_the_ceiling_fails(supply in 0..VIRTUAL_TOKEN_SUPPLY, overshoot in 1u128..1_000_000) {
        let available = VIRTUAL_TOKEN_SUPPLY - supply;
        let result = buy(supply, available + overshoot, 0, 0);
        let is_supply_error = matches!(result, Err(PricingError::InsufficientVirtualSupply { .. }));
        prop_assert!(is_supply_error);
    }

    #[test]
    fn sell_fee_only_removes_proceeds(
        supply in 1..MAX_SUPPLY,
        fraction in 1u128..=100,
        low_fee in 0u16..5_000,
        bump in 0u16..5_000,
    ) {
        let amount = (supply * fraction / 100).max(1);
        let cheap = sell(supply, amount, low_fee, 0).unwrap();
        let dear = sell(supply, amount, low_fee + bump, 0).unwrap();
        prop_assert!(dear.price_or_proceeds <= cheap.price_or_proceeds);
        prop_assert_eq!(dear.before_fee(), cheap.before_fee());
    }

    #[test]
    fn selling_more_than_supply_fails(supply in 0..MAX_SUPPLY, excess in 1u128..1_000_000) {
        prop_assert!(sell(supply, supply + excess, 0, 0).is_err());
    }

    #[test]
    fn net_pay_parts_sum_to_gross(
        salary in 1u64..u64::MAX / 2,
        tax_rate in 0u16..=10_000,
        deduction_share in 0u64..=100,
    ) {
        let after_tax = salary - (u128::from(salary) * u128::from(tax_rate) / 10_000) as u64;
        let deductions = (u128::from(after_tax) * u128::from(deduction_share) / 100) as u64;

        let pay = compute_net_pay(salary, tax_rate, deductions).unwrap();

        prop_assert_eq!(pay.gross, salary);
        prop_assert_eq!(pay.tax + pay.deductions + pay.net, pay.gross);
    }

    #[test]
    fn payment_falls_due_exactly_one_interval_later(
        last_payment in 1i64..4_000_000_000,
        frequency in frequency(),
    ) {
        let due = next_due(last_payment, frequency).unwrap();
        prop_assert_eq!(due, last_payment + frequency.interval_secs());
        prop_assert!(!is_payment_due(last_payment, frequency, due - 1));
        prop_assert!(is_payment_due(last_payment, frequency, due));
    }
}

#[test]
fn never_paid_employees_are_always_due() {
    for frequency in [
        PaymentFrequency::Weekly,
        PaymentFrequency::BiWeekly,
        PaymentFrequency::Monthly,
    ] {
        assert_eq!(next_due(0, frequency), None);
        assert!(is_payment_due(0, frequency, 0));
    }
}

//! Property-based tests for cart totals.

use ethix_core::{Cart, Currency, PaymentRequest, Rail};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Line {
    /// Price in thousandths of a unit
    Priced { quantity: u32, milli: u64 },
    Junk { quantity: u32, price: String },
}

fn line_strategy() -> impl Strategy<Value = Line> {
    prop_oneof![
        3 => (1u32..10_000, 0u64..1_000_000_000)
            .prop_map(|(quantity, milli)| Line::Priced { quantity, milli }),
        1 => (1u32..100, "[a-z]{1,6}|-[1-9][0-9]{0,3}\\.[0-9]{2}")
            .prop_map(|(quantity, price)| Line::Junk { quantity, price }),
    ]
}

fn fill(lines: &[Line]) -> Cart {
    let mut cart = Cart::new();
    for (i, line) in lines.iter().enumerate() {
        let (quantity, price) = match line {
            Line::Priced { quantity, milli } => {
                (*quantity, format!("{}.{:03}", milli / 1000, milli % 1000))
            }
            Line::Junk { quantity, price } => (*quantity, price.clone()),
        };
        cart.add(format!("item-{i}"), quantity, price).unwrap();
    }
    cart
}

/// Sum in thousandths, rounded half away from zero to cents
fn reference_total(lines: &[Line]) -> String {
    let milli: u128 = lines
        .iter()
        .map(|line| match line {
            Line::Priced { quantity, milli } => u128::from(*quantity) * u128::from(*milli),
            Line::Junk { .. } => 0,
        })
        .sum();
    let cents = (milli + 5) / 10;
    format!("{}.{:02}", cents / 100, cents % 100)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn total_matches_exact_reference(lines in prop::collection::vec(line_strategy(), 0..20)) {
        let cart = fill(&lines);
        prop_assert_eq!(cart.len(), lines.len());
        prop_assert_eq!(cart.compute_total(), reference_total(&lines));
    }

    #[test]
    fn request_keeps_every_line(lines in prop::collection::vec(line_strategy(), 0..20)) {
        let cart = fill(&lines);
        let request = PaymentRequest::build(Rail::CreditCard, Currency::USD, &cart);

        prop_assert_eq!(request.cart.len(), lines.len());
        prop_assert_eq!(request.amount, reference_total(&lines));
    }

    #[test]
    fn huge_prices_never_panic(
        prices in prop::collection::vec(("[1-9][0-9]{24,28}", 1u32..1_000), 1..8)
    ) {
        let mut cart = Cart::new();
        for (price, quantity) in &prices {
            cart.add("bulk", *quantity, price.clone()).unwrap();
        }

        let total = cart.compute_total();
        prop_assert!(!total.is_empty());
    }
}

//! Dark Matcher - demo binary
//!
//! Runs one buy order and one sell order through a simulated network of
//! matching nodes: every node holds one fragment of each order and its own
//! fragment matrix, and a single builder collects what the nodes produce.
//!
//! Threshold parameters come from the environment (see `config`).

use std::error::Error;

use rand::rngs::OsRng;
use tracing::info;

use dark_matcher::{ComparisonBuilder, FragmentMatrix, MatcherConfig, Order, OrderId, Side};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let config = MatcherConfig::from_env()?;
    info!(
        parties = config.parties,
        threshold = config.threshold,
        prime_bits = config.prime.bits(),
        "starting matcher demo"
    );

    let buy = Order::from_decimal(OrderId::digest(b"demo-buy"), Side::Buy, (1, 2), "10", "1000", "100")
        .ok_or("buy terms are not representable")?;
    let sell = Order::from_decimal(OrderId::digest(b"demo-sell"), Side::Sell, (1, 2), "10", "1000", "100")
        .ok_or("sell terms are not representable")?;

    let mut rng = OsRng;
    let buy_fragments = buy.split(config.parties, config.threshold, &config.prime, &mut rng)?;
    let sell_fragments = sell.split(config.parties, config.threshold, &config.prime, &mut rng)?;

    let nodes: Vec<FragmentMatrix> = (0..config.parties)
        .map(|_| FragmentMatrix::new(config.prime.clone()))
        .collect();
    let builder = ComparisonBuilder::from_config(&config);

    for (node, (b, s)) in nodes.iter().zip(buy_fragments.into_iter().zip(sell_fragments)) {
        node.insert_order_fragment(b);
        for fragment in node.insert_order_fragment(s) {
            if let Some(comparison) = builder.insert_comparison_fragment(fragment)? {
                let decision = comparison.decide(&config.prime);
                info!(
                    comparison = %comparison.id,
                    tokens = decision.tokens,
                    price = decision.price,
                    volume = decision.volume,
                    matched = decision.is_match(),
                    "comparison complete"
                );
                println!("{}", if decision.is_match() { "MATCH" } else { "NO MATCH" });
            }
        }
    }

    Ok(())
}

//! End-to-end loop test: scripted signals through translation, order
//! persistence, concurrent submission, simulated venue fills, and
//! settlement, over the in-memory ledger with a simulated calendar.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use hermes_clock::SimClock;
use hermes_core::{OrderStatus, PositionSide, SignalFrame, SignalMode, Timestamp};
use hermes_ledger::MemoryLedger;
use hermes_ports::{Clock, LedgerStore, OrderFilter};
use hermes_runner::{RunnerConfig, ScriptedSignalSource, StaticPriceSource, TradeLoop, TradingBootstrap};
use hermes_trader::TraderConfig;
use hermes_venue_sim::{FillPlan, SimVenue, SimVenueConfig};

const AAA: &str = "600036";
const BBB: &str = "000651";

fn start_time() -> Timestamp {
    "2024-03-01T10:00:00Z".parse().unwrap()
}

fn vs_frame(values: [Decimal; 2]) -> SignalFrame {
    SignalFrame::new(
        SignalMode::Vs,
        vec![AAA.to_string(), BBB.to_string()],
        values.to_vec(),
    )
}

fn runner_config() -> RunnerConfig {
    RunnerConfig {
        owner: "loop-test".to_string(),
        initial_cash: dec!(100000),
        interval: Duration::from_millis(50),
        trader: TraderConfig::default(),
    }
}

fn build_loop(
    frames: Vec<SignalFrame>,
    venue_config: SimVenueConfig,
) -> (TradeLoop, TradingBootstrap) {
    let _ = env_logger::builder().is_test(true).try_init();

    let config = runner_config();
    let ledger: Arc<dyn LedgerStore> = Arc::new(MemoryLedger::new());
    let clock: Arc<dyn Clock> = Arc::new(SimClock::starting_at(start_time()));
    let bootstrap = TradingBootstrap::with_parts(&config, ledger, Arc::clone(&clock)).unwrap();

    let (venue, fills) = SimVenue::new(clock, venue_config, 64);
    let prices = StaticPriceSource::new([(AAA.to_string(), dec!(10)), (BBB.to_string(), dec!(20))]);

    let trade_loop = TradeLoop::new(
        config,
        &bootstrap,
        Box::new(ScriptedSignalSource::new(frames)),
        Arc::new(prices),
        Arc::new(venue),
        fills,
    );
    (trade_loop, bootstrap)
}

#[tokio::test(start_paused = true)]
async fn test_full_cycle_buy_settle_sell() {
    let frames = vec![
        // cycle 1: buy 100 AAA at 10
        vs_frame([dec!(100), dec!(0)]),
        // cycle 2: buy 50 BBB at 20; booking its fill settles AAA
        vs_frame([dec!(0), dec!(50)]),
        // cycle 3: AAA is delivered by now, sell 40 of it
        vs_frame([dec!(-40), dec!(0)]),
    ];
    let (trade_loop, bootstrap) = build_loop(frames, SimVenueConfig::default());

    // the loop ends on its own once the script is exhausted
    tokio::spawn(trade_loop.run()).await.unwrap();
    // let the last spawned fill task finish
    tokio::time::sleep(Duration::from_millis(200)).await;

    let ledger = &bootstrap.ledger;
    let account_id = bootstrap.account_id;

    // every order reached a terminal fill
    let orders = ledger.orders(&OrderFilter::account(account_id)).unwrap();
    assert_eq!(orders.len(), 3);
    for order in &orders {
        assert_eq!(order.status, OrderStatus::Filled, "order {:?}", order);
        assert!(order.submitted_time.is_some());
    }

    // AAA: bought 100, delivered, then sold 40
    let aaa = ledger
        .find_position(account_id, AAA, PositionSide::Long)
        .unwrap()
        .unwrap();
    assert_eq!(aaa.qty, dec!(60));
    assert_eq!(aaa.available_qty, dec!(60));

    // BBB: bought 50, delivered by the sell fill's settlement pass
    let bbb = ledger
        .find_position(account_id, BBB, PositionSide::Long)
        .unwrap()
        .unwrap();
    assert_eq!(bbb.qty, dec!(50));
    assert_eq!(bbb.available_qty, dec!(50));

    // cash: -1000 (AAA) -1000 (BBB) +400 sale, with the sale proceeds
    // still awaiting delivery
    let account = ledger.account(account_id).unwrap();
    assert_eq!(account.cash_amount, dec!(98400));
    assert_eq!(account.available_cash, dec!(98000));

    // ledger invariants hold at rest
    assert!(account.available_cash <= account.cash_amount);
    for position in ledger.account_positions(account_id).unwrap() {
        assert!(position.available_qty <= position.qty);
    }
}

#[tokio::test(start_paused = true)]
async fn test_partial_fills_reach_filled() {
    let frames = vec![vs_frame([dec!(100), dec!(0)])];
    let (trade_loop, bootstrap) = build_loop(
        frames,
        SimVenueConfig {
            fill_plan: FillPlan::Tranches(vec![dec!(0.4), dec!(0.6)]),
            ..SimVenueConfig::default()
        },
    );

    tokio::spawn(trade_loop.run()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let ledger = &bootstrap.ledger;
    let orders = ledger
        .orders(&OrderFilter::account(bootstrap.account_id))
        .unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, OrderStatus::Filled);

    let fills = ledger.fills_for_order(orders[0].id).unwrap();
    assert_eq!(fills.len(), 2);
    assert_eq!(fills[0].filled_qty, dec!(40));
    assert_eq!(fills[1].filled_qty, dec!(60));

    let position = ledger
        .find_position(bootstrap.account_id, AAA, PositionSide::Long)
        .unwrap()
        .unwrap();
    assert_eq!(position.qty, dec!(100));
}

#[tokio::test(start_paused = true)]
async fn test_venue_cancel_reconciles_order() {
    let frames = vec![vs_frame([dec!(100), dec!(0)])];
    let (trade_loop, bootstrap) = build_loop(
        frames,
        SimVenueConfig {
            fill_plan: FillPlan::Cancel,
            ..SimVenueConfig::default()
        },
    );

    tokio::spawn(trade_loop.run()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let ledger = &bootstrap.ledger;
    let orders = ledger
        .orders(&OrderFilter::account(bootstrap.account_id))
        .unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, OrderStatus::Canceled);

    // nothing moved: cancellation releases no resources because none
    // were taken at submission
    let account = ledger.account(bootstrap.account_id).unwrap();
    assert_eq!(account.cash_amount, dec!(100000));
    assert_eq!(account.available_cash, dec!(100000));

    let position = ledger
        .find_position(bootstrap.account_id, AAA, PositionSide::Long)
        .unwrap()
        .unwrap();
    assert_eq!(position.qty, Decimal::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_bad_cycle_does_not_kill_the_loop() {
    // first frame asks for a symbol with no price; second is fine
    let broken = SignalFrame::new(
        SignalMode::Vs,
        vec!["UNPRICED".to_string()],
        vec![dec!(10)],
    );
    let frames = vec![broken, vs_frame([dec!(100), dec!(0)])];
    let (trade_loop, bootstrap) = build_loop(frames, SimVenueConfig::default());

    tokio::spawn(trade_loop.run()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    // the second cycle still traded
    let orders = bootstrap
        .ledger
        .orders(&OrderFilter::account(bootstrap.account_id))
        .unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, OrderStatus::Filled);
}

//! Minimal example demonstrating how to use the scheduler.
//!
//! Run with: `cargo run -p scheduler-core --example quickstart`

use scheduler_core::{
    Card, CardId, FactId, Grade, InMemoryStore, Scheduler, SchedulerConfig, SchedulerStore,
};

fn main() {
    // 1. Create a configuration (or use defaults).
    let config = SchedulerConfig::default();

    // 2. Initialize an in-memory store with a few unseen cards. Cards 1 and
    //    2 are sisters: they share fact 1 and will never be scheduled on
    //    the same day.
    let mut store = InMemoryStore::new();
    store.upsert_card(Card::new(CardId::new(1), FactId::new(1)));
    store.upsert_card(Card::new(CardId::new(2), FactId::new(1)));
    store.upsert_card(Card::new(CardId::new(3), FactId::new(2)));

    // 3. Build the scheduler.
    let mut scheduler = Scheduler::new(store, config);

    // 4. Study until the queue runs dry.
    while let Ok(Some(mut card)) = scheduler.next_card(false) {
        // A real host would show the card and read the learner's grade;
        // here everything is recalled effortlessly.
        let interval = scheduler.grade_answer(&mut card, Grade::MoreBig);
        println!(
            "card {} granted {} days, next repetition {}",
            card.id,
            interval / scheduler_core::DAY,
            scheduler.next_rep_to_interval_string(card.next_rep, None),
        );
    }

    println!("scheduled: {}", scheduler.scheduled_count());
    println!("not yet memorised: {}", scheduler.non_memorised_count());
}

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    cycles_announced: AtomicU64,
    cycles_skipped: AtomicU64,
    cycles_failed: AtomicU64,
    cycles_without_votes: AtomicU64,
    messages_sent: AtomicU64,
    unresolved_names: AtomicU64,
    credits_paid: AtomicU64,
    credit_failures: AtomicU64,
}

impl Metrics {
    pub fn record_announced(&self, messages: usize, unresolved: usize) {
        self.cycles_announced.fetch_add(1, Ordering::Relaxed);
        self.unresolved_names
            .fetch_add(unresolved as u64, Ordering::Relaxed);
        self.record_messages(messages);
    }

    pub fn record_messages(&self, messages: usize) {
        self.messages_sent
            .fetch_add(messages as u64, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.cycles_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.cycles_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_without_votes(&self) {
        self.cycles_without_votes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_credits(&self, paid: usize, failed: usize) {
        self.credits_paid.fetch_add(paid as u64, Ordering::Relaxed);
        self.credit_failures
            .fetch_add(failed as u64, Ordering::Relaxed);
    }

    pub fn messages_sent(&self) -> u64 {
        self.messages_sent.load(Ordering::Relaxed)
    }

    pub fn render_prometheus(&self) -> String {
        let announced = self.cycles_announced.load(Ordering::Relaxed);
        let skipped = self.cycles_skipped.load(Ordering::Relaxed);
        let failed = self.cycles_failed.load(Ordering::Relaxed);
        let messages = self.messages_sent.load(Ordering::Relaxed);
        let unresolved = self.unresolved_names.load(Ordering::Relaxed);
        let without_votes = self.cycles_without_votes.load(Ordering::Relaxed);
        let credits = self.credits_paid.load(Ordering::Relaxed);
        let credit_failures = self.credit_failures.load(Ordering::Relaxed);

        format!(
            "# TYPE votebot_cycles_announced_total counter\n\
votebot_cycles_announced_total {}\n\
# TYPE votebot_cycles_skipped_total counter\n\
votebot_cycles_skipped_total {}\n\
# TYPE votebot_cycles_failed_total counter\n\
votebot_cycles_failed_total {}\n\
# TYPE votebot_messages_sent_total counter\n\
votebot_messages_sent_total {}\n\
# TYPE votebot_unresolved_names_total counter\n\
votebot_unresolved_names_total {}\n\
# TYPE votebot_cycles_without_votes_total counter\n\
votebot_cycles_without_votes_total {}\n\
# TYPE votebot_credits_paid_total counter\n\
votebot_credits_paid_total {}\n\
# TYPE votebot_credit_failures_total counter\n\
votebot_credit_failures_total {}\n",
            announced,
            skipped,
            failed,
            messages,
            unresolved,
            without_votes,
            credits,
            credit_failures
        )
    }
}

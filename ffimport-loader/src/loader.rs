//! Statement -> partitioned, batched submissions.

use std::time::Duration;

use ffimport_ingest::{Direction, Statement, normalize_row};
use log::{error, info, warn};

use crate::batch::{BatchOutcome, LoadSummary, batch_count};
use crate::config::Config;
use crate::firefly::LedgerApi;
use crate::transaction::{LedgerTransaction, TransactionGroupRequest};

/// Normalized transactions split by direction, each in statement order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prepared {
    pub outgoing: Vec<LedgerTransaction>,
    pub incoming: Vec<LedgerTransaction>,
    pub date_errors: usize,
    /// Rows dropped because their amount is out of range.
    pub rejected: usize,
}

impl Prepared {
    /// Batches in submission order: all outgoing batches, then all incoming.
    pub fn batches(
        &self,
        batch_size: usize,
    ) -> impl Iterator<Item = (Direction, &[LedgerTransaction])> {
        let size = batch_size.max(1);
        self.outgoing
            .chunks(size)
            .map(|b| (Direction::Outgoing, b))
            .chain(self.incoming.chunks(size).map(|b| (Direction::Incoming, b)))
    }

    pub fn len(&self) -> usize {
        self.outgoing.len() + self.incoming.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Normalize every row and partition by direction. Rows with unreadable dates
/// are kept with no date; rows whose amount is out of range are dropped.
pub fn prepare(statement: &Statement, tracked_account: &str, config: &Config) -> Prepared {
    let opts = config.normalize_options();
    let mut prepared = Prepared::default();

    for (i, raw) in statement.rows.iter().enumerate() {
        let normalized = match normalize_row(raw, &opts) {
            Ok(n) => n,
            Err(e) => {
                error!("row {}: {e}; not submitted", i + 1);
                prepared.rejected += 1;
                continue;
            }
        };
        if let Some(e) = normalized.date_error {
            warn!("row {}: {e}; submitting without a date", i + 1);
            prepared.date_errors += 1;
        }

        let tx = LedgerTransaction::from_row(normalized.row, tracked_account, &config.app.currency);
        match tx.direction {
            Direction::Outgoing => prepared.outgoing.push(tx),
            Direction::Incoming => prepared.incoming.push(tx),
        }
    }

    prepared
}

/// Drives one statement into the ledger, one batch at a time.
pub struct StatementLoader<A> {
    config: Config,
    api: A,
}

impl<A: LedgerApi> StatementLoader<A> {
    pub fn new(config: Config, api: A) -> Self {
        Self { config, api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Normalize, partition and submit `statement`.
    ///
    /// Failed batches are counted and skipped; the load always runs to the end.
    pub async fn load(
        &self,
        statement: &Statement,
        tracked_account: &str,
        group_label: Option<&str>,
    ) -> LoadSummary {
        let prepared = prepare(statement, tracked_account, &self.config);
        info!(
            "Prepared {} transactions from csv ({} outgoing, {} incoming)",
            prepared.len(),
            prepared.outgoing.len(),
            prepared.incoming.len()
        );
        if prepared.is_empty() {
            warn!("nothing to submit");
        }
        self.submit(&prepared, group_label).await
    }

    /// Submit already prepared transactions.
    pub async fn submit(&self, prepared: &Prepared, group_label: Option<&str>) -> LoadSummary {
        let batch_size = self.config.app.batch_size;
        let mut summary = LoadSummary {
            prepared_outgoing: prepared.outgoing.len(),
            prepared_incoming: prepared.incoming.len(),
            date_errors: prepared.date_errors,
            rejected: prepared.rejected,
            failed: prepared.rejected,
            ..LoadSummary::default()
        };

        let totals = [
            batch_count(prepared.outgoing.len(), batch_size),
            batch_count(prepared.incoming.len(), batch_size),
        ];
        let mut index = [0usize; 2];
        let mut pause: Option<Duration> = None;

        for (direction, batch) in prepared.batches(batch_size) {
            if let Some(d) = pause.take() {
                tokio::time::sleep(d).await;
            }

            let slot = direction_slot(direction);
            index[slot] += 1;
            let label = format!("{:?} batch {}/{}", direction, index[slot], totals[slot]);

            let request = TransactionGroupRequest {
                apply_rules: self.config.app.apply_rules,
                group_title: group_label,
                transactions: batch,
            };

            let outcome = match self.api.create_transactions(&request).await {
                Ok(()) => {
                    info!("{label}: posted {} txs", batch.len());
                    pause = Some(self.config.success_delay());
                    BatchOutcome::Succeeded(batch.len())
                }
                Err(e) => {
                    error!("{label}: failed ({} txs): {e}", batch.len());
                    pause = Some(self.config.failure_delay());
                    BatchOutcome::Failed(batch.len())
                }
            };
            summary.record(outcome);
        }

        info!("Done. {summary}");
        summary
    }
}

fn direction_slot(direction: Direction) -> usize {
    match direction {
        Direction::Outgoing => 0,
        Direction::Incoming => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(batch_size: usize) -> Config {
        Config::from_toml_str(&format!(
            "[app]\nbatch_size = {batch_size}\ncurrency = \"INR\"\n\n[firefly]\nbase_url = \"http://localhost:8080\"\ntoken = \"t\"\n"
        ))
        .unwrap()
    }

    fn statement(amounts: &[&str]) -> Statement {
        let mut text = String::from("date,description,amount\n");
        for (i, a) in amounts.iter().enumerate() {
            text.push_str(&format!("2024-01-{:02},ROW{i},{a}\n", i + 1));
        }
        Statement::from_csv_str(&text).unwrap()
    }

    #[test]
    fn test_prepare_partitions_and_keeps_order() {
        let st = statement(&["10", "-1", "20", "-2", "30"]);
        let p = prepare(&st, "Card", &config(10));
        let out: Vec<_> = p.outgoing.iter().map(|t| t.description.as_str()).collect();
        let inc: Vec<_> = p.incoming.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(out, ["ROW0", "ROW2", "ROW4"]);
        assert_eq!(inc, ["ROW1", "ROW3"]);
        assert_eq!(p.date_errors, 0);
    }

    #[test]
    fn test_batches_sizes_and_order() {
        let amounts: Vec<&str> = std::iter::repeat_n("1", 7)
            .chain(std::iter::repeat_n("-1", 3))
            .collect();
        let p = prepare(&statement(&amounts), "Card", &config(3));
        let shape: Vec<(Direction, usize)> = p.batches(3).map(|(d, b)| (d, b.len())).collect();
        assert_eq!(
            shape,
            [
                (Direction::Outgoing, 3),
                (Direction::Outgoing, 3),
                (Direction::Outgoing, 1),
                (Direction::Incoming, 3),
            ]
        );
    }

    #[test]
    fn test_unreadable_date_counted() {
        let st = Statement::from_csv_str("date,amount\nnot a date,5\n2024-01-01,6\n").unwrap();
        let p = prepare(&st, "Card", &config(10));
        assert_eq!(p.date_errors, 1);
        assert_eq!(p.outgoing.len(), 2);
        assert_eq!(p.outgoing[0].date, None);
    }

    #[test]
    fn test_out_of_range_amount_dropped_and_counted() {
        let st = Statement::from_csv_str(
            "date,description,amount\n2024-01-01,OK,5\n2024-01-02,HUGE,100000000000000000000000000000\n2024-01-03,BIG,-1000000000000000000000000000\n",
        )
        .unwrap();
        let p = prepare(&st, "Card", &config(10));
        assert_eq!(p.rejected, 2);
        assert_eq!(p.len(), 1);
        assert_eq!(p.outgoing[0].description, "OK");
        assert!(p.incoming.is_empty());
    }
}

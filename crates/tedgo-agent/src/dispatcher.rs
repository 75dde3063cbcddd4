//! Turns one line of user input into one reply.
//!
//! Each line is handled on its own; the only state shared between lines is
//! the pending-operation store and the interaction log. Every reply is
//! written to the log together with the input that produced it.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tedgo_core::{classify, Intent, LedgerEntry, Operation, RemoteResult, TransactionSpec};
use tedgo_sdk::NodeClient;
use tedgo_state::{InteractionLog, OperationStore};
use tracing::{debug, warn};

use crate::config::AgentConfig;
use crate::reconciler::Reconciler;
use crate::replies;

/// Sender used for self-generated test operations.
pub const SYSTEM_SENDER: &str = "Sistema";

const BLOCKS_SHOWN: usize = 10;
const HASH_CHARS: usize = 16;
const DATA_CHARS: usize = 60;

/// What the session should do after a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Continue(String),
    /// Print the text, then end the session.
    Exit(String),
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Continue(text) | Reply::Exit(text) => text,
        }
    }
}

pub struct Dispatcher {
    client: Arc<dyn NodeClient>,
    store: Arc<dyn OperationStore>,
    log: Arc<dyn InteractionLog>,
    reconciler: Reconciler,
    history_display: usize,
    rng: StdRng,
}

impl Dispatcher {
    pub fn new(
        client: Arc<dyn NodeClient>,
        store: Arc<dyn OperationStore>,
        log: Arc<dyn InteractionLog>,
        config: &AgentConfig,
    ) -> Self {
        let reconciler = Reconciler::new(store.clone(), client.clone(), config.retry_pause());
        Self {
            client,
            store,
            log,
            reconciler,
            history_display: config.history_display,
            rng: StdRng::from_entropy(),
        }
    }

    /// Use a fixed seed for generated test transfers and greeting choice.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Classify and dispatch one line.
    pub async fn handle(&mut self, text: &str) -> Reply {
        let intent = classify(text);
        self.dispatch(text, intent).await
    }

    /// Dispatch a line whose intent is already known.
    pub async fn dispatch(&mut self, text: &str, intent: Intent) -> Reply {
        debug!(intent = intent.name(), "dispatching input");
        record(self.log.as_ref(), &format!("Usuário: {text}")).await;

        let reply = match intent {
            Intent::Help => Reply::Continue(replies::HELP_TEXT.to_string()),
            Intent::ListBlocks => Reply::Continue(self.list_blocks().await),
            Intent::SubmitTransaction(None) => Reply::Continue(replies::TX_USAGE.to_string()),
            Intent::SubmitTransaction(Some(spec)) => {
                Reply::Continue(self.submit_transaction(spec).await)
            }
            Intent::MineTest => Reply::Continue(self.mine_test().await),
            Intent::ShowHistory => Reply::Continue(self.show_history().await),
            Intent::Exit => Reply::Exit(replies::GOODBYE.to_string()),
            Intent::FreeChat => Reply::Continue(self.free_chat(text).await),
        };

        record(self.log.as_ref(), &format!("{}: {}", replies::BOT_NAME, reply.text())).await;
        reply
    }

    async fn list_blocks(&self) -> String {
        let ledger = match self.client.fetch_ledger().await {
            RemoteResult::Success(ledger) => ledger,
            RemoteResult::Failure(cause) => return replies::blocks_error(&cause),
        };

        let Some(blocks) = ledger.as_array() else {
            warn!("GET /blocks did not return a JSON array");
            return replies::BLOCKS_SHAPE_MISMATCH.to_string();
        };

        render_blocks(blocks)
    }

    async fn submit_transaction(&self, spec: TransactionSpec) -> String {
        let op = Operation::new(spec);
        match self.submit_or_cache(op).await {
            Submission::Sent(response) => replies::tx_sent(&response),
            Submission::Cached(cause) => replies::tx_cached(&cause),
            Submission::Lost { cause, store_error } => replies::not_cached(&cause, &store_error),
        }
    }

    async fn mine_test(&mut self) -> String {
        let recipient = format!("User-{}", self.rng.gen_range(1..=9999));
        let amount = self.rng.gen_range(1..=100u32);
        let op = Operation::new(TransactionSpec {
            sender: SYSTEM_SENDER.to_string(),
            recipient,
            amount: f64::from(amount),
        });

        match self.submit_or_cache(op).await {
            Submission::Sent(_) => replies::MINE_SENT.to_string(),
            Submission::Cached(cause) => replies::mine_cached(&cause),
            Submission::Lost { cause, store_error } => replies::not_cached(&cause, &store_error),
        }
    }

    /// Send `op`; on failure keep it in the store for a later resend.
    async fn submit_or_cache(&self, op: Operation) -> Submission {
        match self.client.submit(&op).await {
            RemoteResult::Success(response) => {
                record(self.log.as_ref(), &format!("TX enviado: {}", op.to_json())).await;
                Submission::Sent(response)
            }
            RemoteResult::Failure(cause) => {
                let json = op.to_json();
                if let Err(e) = self.store.append_pending(op).await {
                    warn!(error = %e, "could not cache failed operation");
                    record(self.log.as_ref(), &format!("TX perdido (erro ao salvar): {json}")).await;
                    return Submission::Lost {
                        cause,
                        store_error: e.to_string(),
                    };
                }
                record(
                    self.log.as_ref(),
                    &format!("TX salvo em cache (erro ao enviar): {json}"),
                )
                .await;
                Submission::Cached(cause)
            }
        }
    }

    async fn show_history(&self) -> String {
        match self.log.recent(self.history_display).await {
            Ok(lines) if lines.is_empty() => replies::HISTORY_EMPTY.to_string(),
            Ok(lines) => lines.join("\n"),
            Err(e) => format!("Não consegui ler o histórico: {e}"),
        }
    }

    async fn free_chat(&mut self, text: &str) -> String {
        let normalized = text.to_lowercase();
        let mentions = |words: &[&str]| words.iter().any(|w| normalized.contains(w));

        if mentions(replies::RESEND_WORDS) {
            self.reconciler.reconcile().await
        } else if mentions(replies::GREETING_WORDS) {
            replies::GREETINGS
                .choose(&mut self.rng)
                .copied()
                .unwrap_or(replies::GREETINGS[0])
                .to_string()
        } else if mentions(replies::SMALL_TALK_WORDS) {
            replies::SMALL_TALK.to_string()
        } else {
            replies::NOT_UNDERSTOOD.to_string()
        }
    }
}

enum Submission {
    Sent(String),
    Cached(String),
    /// Neither sent nor cached.
    Lost { cause: String, store_error: String },
}

/// Append to the interaction log; failures are reported, never propagated.
pub async fn record(log: &dyn InteractionLog, line: &str) {
    if let Err(e) = log.append(line).await {
        warn!(error = %e, "could not write interaction log");
    }
}

/// Last few blocks, one line each, with hash and data shortened for display.
fn render_blocks(blocks: &[serde_json::Value]) -> String {
    if blocks.is_empty() {
        return replies::BLOCKS_EMPTY.to_string();
    }

    blocks[blocks.len().saturating_sub(BLOCKS_SHOWN)..]
        .iter()
        .map(LedgerEntry::from_value)
        .map(|entry| {
            format!(
                "- Hash: {}... | Data: {}",
                truncate_chars(&entry.hash, HASH_CHARS),
                truncate_chars(&entry.data, DATA_CHARS)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

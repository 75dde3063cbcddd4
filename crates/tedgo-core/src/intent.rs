//! Intent classification and transaction extraction.
//!
//! Classification walks an ordered rule table and stops at the first match.
//! The order is the tie-break: text mentioning both "ajuda" and "blocos" is
//! a help request.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::operation::TransactionSpec;

/// The classified purpose of one line of user input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "transaction", rename_all = "snake_case")]
pub enum Intent {
    Help,
    ListBlocks,
    /// Carries the extracted parameters, or `None` when the text looked like
    /// a transfer but matched neither accepted form.
    SubmitTransaction(Option<TransactionSpec>),
    MineTest,
    ShowHistory,
    Exit,
    FreeChat,
}

impl Intent {
    /// Short stable name, used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Help => "help",
            Intent::ListBlocks => "list_blocks",
            Intent::SubmitTransaction(_) => "submit_transaction",
            Intent::MineTest => "mine_test",
            Intent::ShowHistory => "show_history",
            Intent::Exit => "exit",
            Intent::FreeChat => "free_chat",
        }
    }
}

/// Rule outcome before transaction parameters are attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IntentKind {
    Help,
    ListBlocks,
    SubmitTransaction,
    MineTest,
    ShowHistory,
    Exit,
}

/// One entry of the classifier table.
struct Rule {
    kind: IntentKind,
    matches: fn(&str) -> bool,
}

pub const HELP_WORDS: &[&str] = &["help", "ajuda"];
pub const BLOCK_WORDS: &[&str] = &["block", "bloco"];
pub const MINE_WORDS: &[&str] = &["mine", "minerar"];
pub const HISTORY_WORDS: &[&str] = &["hist", "history"];
pub const EXIT_WORDS: &[&str] = &["sair", "exit", "quit", "tchau"];

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

fn asks_for_help(text: &str) -> bool {
    contains_any(text, HELP_WORDS)
}

fn mentions_blocks(text: &str) -> bool {
    contains_any(text, BLOCK_WORDS)
}

fn looks_like_transaction(text: &str) -> bool {
    text.starts_with("tx ") || text.starts_with("transa") || text.contains("->")
}

fn asks_to_mine(text: &str) -> bool {
    contains_any(text, MINE_WORDS)
}

fn asks_for_history(text: &str) -> bool {
    contains_any(text, HISTORY_WORDS)
}

fn says_goodbye(text: &str) -> bool {
    contains_any(text, EXIT_WORDS)
}

/// Evaluated top to bottom; first hit wins.
const RULES: &[Rule] = &[
    Rule {
        kind: IntentKind::Help,
        matches: asks_for_help,
    },
    Rule {
        kind: IntentKind::ListBlocks,
        matches: mentions_blocks,
    },
    Rule {
        kind: IntentKind::SubmitTransaction,
        matches: looks_like_transaction,
    },
    Rule {
        kind: IntentKind::MineTest,
        matches: asks_to_mine,
    },
    Rule {
        kind: IntentKind::ShowHistory,
        matches: asks_for_history,
    },
    Rule {
        kind: IntentKind::Exit,
        matches: says_goodbye,
    },
];

const AMOUNT: &str = r"([0-9]+(?:\.[0-9]+)?)";

static MARKER_FORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(?:tx|transa[cç][aã]o)\s+(\S+)\s+(\S+)\s+{AMOUNT}\s*$"
    ))
    .expect("marker form regex is valid")
});

static ARROW_FORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^(\S+)\s*->\s*(\S+)\s+{AMOUNT}\s*$"))
        .expect("arrow form regex is valid")
});

/// Classify free text into an [`Intent`].
///
/// Pure over the trimmed, lower-cased input.
pub fn classify(text: &str) -> Intent {
    let normalized = text.trim().to_lowercase();

    let kind = RULES
        .iter()
        .find(|rule| (rule.matches)(&normalized))
        .map(|rule| rule.kind);

    match kind {
        Some(IntentKind::Help) => Intent::Help,
        Some(IntentKind::ListBlocks) => Intent::ListBlocks,
        Some(IntentKind::SubmitTransaction) => Intent::SubmitTransaction(extract_transaction(text)),
        Some(IntentKind::MineTest) => Intent::MineTest,
        Some(IntentKind::ShowHistory) => Intent::ShowHistory,
        Some(IntentKind::Exit) => Intent::Exit,
        None => Intent::FreeChat,
    }
}

/// Extract `{sender, recipient, amount}` from transaction text.
///
/// Accepts `tx <from> <to> <amount>` (or `transação ...`) and
/// `<from> -> <to> <amount>`, in that order. With several arrows the last
/// one separates sender from recipient. Returns `None` for anything else,
/// including negative, exponent or thousands-separated amounts.
pub fn extract_transaction(text: &str) -> Option<TransactionSpec> {
    let text = text.trim();

    let caps = MARKER_FORM
        .captures(text)
        .or_else(|| ARROW_FORM.captures(text))?;

    let amount: f64 = caps[3].parse().ok()?;
    TransactionSpec::new(&caps[1], &caps[2], amount).ok()
}

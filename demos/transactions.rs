//! Transaction ledger demo for keyed-table
//!
//! This demo shows how to:
//! - Index transactions by sender with a SHA-256 placement strategy
//! - Search, remove and clear an index
//! - Use unique mode with set/get/update/remove
//!
//! Run with `RUST_LOG=debug` to see rehash events. Pass a file path to load
//! other records; lines are `sender receiver amount`, `#` starts a comment.

use std::error::Error;
use std::fmt;
use std::fs;

use keyed_table::{IndexTable, NaturalEq, Sha256Digest, TableConfig, UniqueTable};
use log::{info, warn};

const BUNDLED: &str = include_str!("transactions.txt");

#[derive(Clone, Debug, PartialEq)]
struct Transaction {
    sender: String,
    receiver: String,
    amount: f64,
}

impl Transaction {
    fn new(sender: &str, receiver: &str, amount: f64) -> Self {
        Self {
            sender: sender.to_string(),
            receiver: receiver.to_string(),
            amount,
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.sender, self.receiver, self.amount)
    }
}

fn parse(text: &str) -> Result<Vec<Transaction>, Box<dyn Error>> {
    let mut out = Vec::new();
    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            [sender, receiver, amount] => {
                out.push(Transaction::new(sender, receiver, amount.parse()?));
            }
            _ => warn!("skipping malformed line {}: {:?}", n + 1, line),
        }
    }
    Ok(out)
}

fn sender(t: &Transaction) -> String {
    t.sender.clone()
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let text = match std::env::args().nth(1) {
        Some(path) => fs::read_to_string(path)?,
        None => BUNDLED.to_string(),
    };
    let records = parse(&text)?;
    info!("loaded {} transactions", records.len());

    // Index mode: every transaction filed under its sender.
    let config = TableConfig::builder()
        .with_initial_buckets(5)
        .with_max_load_factor(0.5)
        .build()?;
    let mut ledger = IndexTable::with_parts(config, sender, Sha256Digest, NaturalEq);
    for t in records {
        ledger.insert(t);
    }

    println!("--- Ledger by sender ---");
    print!("{}", ledger);
    println!(
        "{} senders, {} transactions, {} buckets, load {:.2}",
        ledger.key_count(),
        ledger.len(),
        ledger.bucket_count(),
        ledger.load_factor()
    );

    let who = "juan-diego".to_string();
    if ledger.find(&who) {
        let total: f64 = ledger.search(&who).map(|t| t.amount).sum();
        println!("\n--- Sent by {} (total {}) ---", who, total);
        for t in ledger.search(&who) {
            println!("{}", t);
        }
    }

    ledger.remove(&who);
    println!("\n--- After removing {} ---", who);
    print!(
        "{}",
        ledger.display_with(|f, k| write!(f, "{}", k), |f, t| write!(f, "{}", t.receiver))
    );

    ledger.clear();
    println!(
        "\ncleared: {} senders, {} buckets kept",
        ledger.key_count(),
        ledger.bucket_count()
    );

    // Unique mode: one note per transaction, keyed by the transaction itself.
    let config = TableConfig::builder()
        .with_initial_buckets(5)
        .with_max_load_factor(0.5)
        .build()?;
    let mut notes = UniqueTable::with_parts(config, Sha256Digest, NaturalEq);
    notes.set(Transaction::new("samanta", "anderson", 2.4), "guarana".to_string())?;
    notes.set(Transaction::new("juan-diego", "samanta", 24.0), "vegan hot dog".to_string())?;

    println!("\n--- Notes ---");
    print!("{}", notes);

    let tx = Transaction::new("juan-diego", "samanta", 24.0);
    if notes.find(&tx) {
        println!("\n{}", notes.get(&tx)?);
    }

    notes.update(&tx, "super vegan hot dog".to_string());
    println!("\n--- After update ---");
    print!("{}", notes);

    notes.remove(&tx);
    println!("\n--- After remove ---");
    print!("{}", notes);

    if let Err(e) = notes.get(&tx) {
        println!("\nlookup after remove: {}", e);
    }

    Ok(())
}

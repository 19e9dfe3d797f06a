use std::io::{self, BufRead};

use clap::Parser;
use depthbook::{
    book::{btree_book::BTreeBook, Book},
    common::{Price, Quantity, Side},
    order::{OrderId, PlainOrder},
};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(about = "Drive an order book with JSON commands read from stdin")]
struct Opts {
    /// Identifier of the book
    #[arg(long, default_value_t = 1)]
    id: u64,
    /// Human-readable market name
    #[arg(long, default_value = "Basic")]
    name: String,
    /// Market ticker
    #[arg(long, default_value = "BAS")]
    ticker: String,
    /// Log level used when RUST_LOG is unset
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Deserialize)]
enum Command {
    Place(PlainOrder),
    Submit {
        side: Side,
        price: Price,
        quantity: Quantity,
    },
    Cancel {
        id: OrderId,
    },
    Get {
        id: OrderId,
    },
    Depth,
}

fn main() -> eyre::Result<()> {
    let opts = Opts::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&opts.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let mut book: BTreeBook<PlainOrder> =
        BTreeBook::new(opts.id, opts.name, opts.ticker);

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim() == "exit" {
            break;
        }

        match serde_json::from_str(&line) {
            Ok(Command::Place(order)) => println!("{:?}", book.place(order)),
            Ok(Command::Submit {
                side,
                price,
                quantity,
            }) => println!("{:?}", book.submit(side, price, quantity)),
            Ok(Command::Cancel { id }) => println!("{:?}", book.cancel(id)),
            Ok(Command::Get { id }) => println!("{:?}", book.order(id)),
            Ok(Command::Depth) => {
                println!("{}", serde_json::to_string(&book.market_depth())?)
            }
            Err(e) => println!("Malformed command JSON: {e:?}"),
        }

        println!("{}", book);
    }

    Ok(())
}

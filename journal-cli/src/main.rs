//! Trade Journal CLI — log in, record trades and inspect analytics from a shell.
//!
//! Commands:
//! - `login` / `logout` — manage the saved session
//! - `add` — record a trade through the same form path the TUI uses
//! - `trades` — list the logged-in user's trades
//! - `analytics` — summary, win/loss, per-symbol totals and equity curve
//! - `export` — write trades (or the equity curve) as CSV
//! - `symbols` — list or search the symbol catalog

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use journal_core::analytics::{date_label, format_usd};
use journal_core::config::config_dir;
use journal_core::domain::{search_symbols, CUSTOM_MISTAKE, MISTAKES, TRADE_TYPES};
use journal_core::{
    export, logging, Analytics, Field, JournalClient, JournalConfig, Session, SessionStore,
    Trade, TradeApi, TradeForm,
};

#[derive(Parser)]
#[command(name = "journal", about = "Trade Journal CLI — record trades and review performance")]
struct Cli {
    /// Config file. Defaults to <config dir>/trade-journal/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and save the session for later commands.
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "JOURNAL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the saved session.
    Logout,
    /// Record a trade.
    Add(AddArgs),
    /// List your trades.
    Trades {
        /// Print the raw records as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Summary statistics, win/loss, P/L by symbol and the equity curve.
    Analytics {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write your trades as CSV.
    Export {
        #[arg(long)]
        output: PathBuf,

        /// Export the equity curve instead of the trade list.
        #[arg(long, default_value_t = false)]
        equity: bool,
    },
    /// List or search tradable symbols.
    Symbols {
        query: Option<String>,
    },
}

/// Form fields as flags. Values go through the form's own coercion:
/// unparseable numbers become 0 and an unparseable time fails the save.
#[derive(clap::Args, Debug, Default)]
struct AddArgs {
    #[arg(long)]
    symbol: String,

    /// BUY or SELL.
    #[arg(long = "type")]
    trade_type: String,

    #[arg(long)]
    volume: Option<String>,
    #[arg(long)]
    price_open: Option<String>,
    #[arg(long)]
    price_close: Option<String>,
    #[arg(long)]
    take_profit: Option<String>,
    #[arg(long)]
    stop_loss: Option<String>,
    #[arg(long)]
    profit_amount: Option<String>,
    #[arg(long)]
    loss_amount: Option<String>,
    #[arg(long)]
    net_profit: Option<String>,

    #[arg(long)]
    reason: Option<String>,

    /// Mistake category, e.g. FOMO or "No Stop-Loss".
    #[arg(long)]
    mistake: Option<String>,

    /// Free-text mistake; implies `--mistake Custom`.
    #[arg(long)]
    custom_mistake: Option<String>,

    /// YYYY-MM-DDTHH:MM local time, or RFC 3339. Defaults to now.
    #[arg(long)]
    open_time: Option<String>,
    #[arg(long)]
    close_time: Option<String>,
}

impl AddArgs {
    fn into_form(self) -> Result<TradeForm> {
        let trade_type = self.trade_type.trim().to_ascii_uppercase();
        if !TRADE_TYPES.contains(&trade_type.as_str()) {
            bail!("--type must be one of {}", TRADE_TYPES.join(", "));
        }

        let mut form = TradeForm::new();
        form.set(Field::Symbol, self.symbol);
        form.set(Field::TradeType, trade_type);

        let optional = [
            (Field::Volume, self.volume),
            (Field::PriceOpen, self.price_open),
            (Field::PriceClose, self.price_close),
            (Field::TakeProfit, self.take_profit),
            (Field::StopLoss, self.stop_loss),
            (Field::ProfitAmount, self.profit_amount),
            (Field::LossAmount, self.loss_amount),
            (Field::NetProfit, self.net_profit),
            (Field::Reason, self.reason),
            (Field::OpenTime, self.open_time),
            (Field::CloseTime, self.close_time),
        ];
        for (field, value) in optional {
            if let Some(v) = value {
                form.set(field, v);
            }
        }

        match (self.mistake, self.custom_mistake) {
            (_, Some(text)) => {
                form.select_mistake(CUSTOM_MISTAKE);
                form.set_custom_mistake(text);
            }
            (Some(choice), None) => {
                let Some(known) = MISTAKES.iter().find(|m| m.eq_ignore_ascii_case(choice.trim()))
                else {
                    bail!("unknown mistake {choice:?}. Valid: {}", MISTAKES.join(", "));
                };
                form.select_mistake(known);
            }
            (None, None) => {}
        }
        Ok(form)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = JournalConfig::load(cli.config.as_deref()).context("loading configuration")?;
    logging::init_stderr(&config.log.filter).context("initializing logging")?;

    let store = SessionStore::in_dir(&config_dir());

    match cli.command {
        Commands::Login { email, password } => run_login(&config, &store, &email, &password),
        Commands::Logout => run_logout(&store),
        Commands::Add(args) => run_add(&config, &store, args),
        Commands::Trades { json } => run_trades(&config, &store, json),
        Commands::Analytics { json } => run_analytics(&config, &store, json),
        Commands::Export { output, equity } => run_export(&config, &store, &output, equity),
        Commands::Symbols { query } => {
            run_symbols(query.as_deref().unwrap_or(""));
            Ok(())
        }
    }
}

fn client(config: &JournalConfig, session: Option<&Session>) -> Result<JournalClient> {
    let client = JournalClient::new(&config.api).context("building backend client")?;
    Ok(client.with_token(session.map(|s| s.access_token.clone())))
}

fn require_session(store: &SessionStore) -> Result<Session> {
    match store.load() {
        Some(session) => Ok(session),
        None => bail!("not logged in; run `journal login` first"),
    }
}

fn run_login(config: &JournalConfig, store: &SessionStore, email: &str, password: &str) -> Result<()> {
    let api = client(config, None)?;
    let session = api
        .login(email.trim(), password)
        .map_err(|e| anyhow::anyhow!(e.user_message("Login failed.")))?;
    store.save(&session)?;
    tracing::info!(user_id = session.user_id(), path = %store.path().display(), "session saved");
    println!("Logged in as {} ({}).", session.user.display_name(), session.user_id());
    Ok(())
}

fn run_logout(store: &SessionStore) -> Result<()> {
    store.clear()?;
    println!("Logged out.");
    Ok(())
}

fn run_add(config: &JournalConfig, store: &SessionStore, args: AddArgs) -> Result<()> {
    let session = store.load();
    let api = client(config, session.as_ref())?;
    let mut form = args.into_form()?;

    match form.submit(session.as_ref(), &api, chrono::Utc::now()) {
        Ok(outcome) => {
            println!("{}", outcome.message());
            Ok(())
        }
        Err(e) => bail!(e.user_message()),
    }
}

fn fetch_trades(config: &JournalConfig, store: &SessionStore) -> Result<Vec<Trade>> {
    let session = require_session(store)?;
    let api = client(config, Some(&session))?;
    let trades = api
        .trades_for_user(session.user_id())
        .map_err(|e| anyhow::anyhow!(e.user_message("Could not load trades.")))?;
    tracing::debug!(count = trades.len(), user_id = session.user_id(), "trades fetched");
    Ok(trades)
}

fn run_trades(config: &JournalConfig, store: &SessionStore, json: bool) -> Result<()> {
    let trades = fetch_trades(config, store)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&trades)?);
        return Ok(());
    }
    if trades.is_empty() {
        println!("No trades recorded yet.");
        return Ok(());
    }

    println!(
        "{:<10} {:<10} {:<5} {:>8} {:>10} {:>10} {:>12}  Mistake",
        "Closed", "Symbol", "Type", "Volume", "Open", "Close", "Net P/L"
    );
    for t in &trades {
        println!(
            "{:<10} {:<10} {:<5} {:>8} {:>10} {:>10} {:>12}  {}",
            date_label(t.close_time),
            t.symbol,
            t.trade_type.as_ref().map(|k| k.to_string()).unwrap_or_default(),
            t.volume,
            t.price_open,
            t.price_close,
            format_usd(t.net_profit),
            t.mistake.as_deref().unwrap_or(""),
        );
    }
    Ok(())
}

fn run_analytics(config: &JournalConfig, store: &SessionStore, json: bool) -> Result<()> {
    let trades = fetch_trades(config, store)?;
    let analytics = Analytics::compute(&trades);
    if json {
        println!("{}", serde_json::to_string_pretty(&analytics)?);
        return Ok(());
    }
    if analytics.is_empty() {
        println!("No trades available for analytics yet.");
        return Ok(());
    }
    print_analytics(&analytics);
    Ok(())
}

fn print_analytics(a: &Analytics) {
    let s = &a.summary;
    println!("=== Summary ===");
    println!("Total P/L:    {}", s.total_pl_display());
    println!("Win Rate:     {}", s.win_rate_display());
    println!("Best Trade:   {}", s.best_trade_display());
    println!("Worst Trade:  {}", s.worst_trade_display());
    println!("Trades:       {}", s.trade_count);
    println!();

    println!("=== Win / Loss ===");
    println!("Wins:   {}", a.win_loss.wins);
    println!("Losses: {}", a.win_loss.losses);
    println!();

    println!("=== P/L by Symbol ===");
    for p in &a.symbol_performance {
        println!("{:<10} {:>12}  ({} trades)", p.symbol, format_usd(p.profit), p.trades);
    }
    println!();

    println!("=== Equity Curve ===");
    for point in &a.equity_curve {
        println!("{:<12} {:>12}", point.date, format_usd(point.equity));
    }
}

fn run_export(config: &JournalConfig, store: &SessionStore, output: &Path, equity: bool) -> Result<()> {
    let trades = fetch_trades(config, store)?;
    let content = if equity {
        export::equity_csv(&journal_core::analytics::equity_curve(&trades))?
    } else {
        export::trades_csv(&trades)?
    };
    export::write_file(output, &content)?;
    println!("Wrote {} trades to {}", trades.len(), output.display());
    Ok(())
}

fn run_symbols(query: &str) {
    let matches = search_symbols(query);
    if matches.is_empty() {
        println!("No matching symbols.");
    }
    for info in matches {
        println!("{}", info.label);
    }
}

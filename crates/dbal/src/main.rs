use clap::{Parser, Subcommand};
use dbal_access::{ConnectionConfig, DataAccess, DbError, ErrorKind, Fields, Value};
use std::process::ExitCode;

mod output;

#[derive(Debug, Parser)]
#[command(
    name = "dbal",
    version,
    about = "Simple CRUD access to SQLite and MySQL databases",
    disable_help_subcommand = true
)]
struct Cli {
    /// Database backend: SQLite or MySQL
    #[arg(short = 'b', long, env = "DBAL_BACKEND", default_value = "SQLite")]
    backend: String,

    /// SQLite file path, or MySQL database name
    #[arg(short = 'd', long, env = "DBAL_DATABASE", value_name = "NAME")]
    database: Option<String>,

    /// MySQL server host
    #[arg(long, env = "DBAL_HOST")]
    host: Option<String>,

    /// MySQL server port
    #[arg(long, env = "DBAL_PORT")]
    port: Option<u16>,

    #[arg(short = 'u', long, env = "DBAL_USER")]
    user: Option<String>,

    #[arg(long, env = "DBAL_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// How rows are printed
    #[arg(long, value_enum, default_value_t = output::Format::Json)]
    format: output::Format,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run literal SQL with no parameters
    Exec { sql: String },

    /// Print every matching row
    Select {
        table: String,
        #[arg(short = 'w', long = "where", value_name = "COL=VALUE", value_parser = parse_pair)]
        filters: Vec<(String, Value)>,
        /// Trailing SQL such as "ORDER BY id DESC LIMIT 10"
        #[arg(long, default_value = "")]
        extra: String,
    },

    /// Print the first matching row
    Get {
        table: String,
        #[arg(short = 'w', long = "where", value_name = "COL=VALUE", value_parser = parse_pair)]
        filters: Vec<(String, Value)>,
    },

    /// Insert one row and print its id
    Insert {
        table: String,
        #[arg(short = 's', long = "set", value_name = "COL=VALUE", value_parser = parse_pair, required = true)]
        fields: Vec<(String, Value)>,
    },

    /// Update matching rows and print how many changed
    Update {
        table: String,
        #[arg(short = 's', long = "set", value_name = "COL=VALUE", value_parser = parse_pair, required = true)]
        fields: Vec<(String, Value)>,
        #[arg(short = 'w', long = "where", value_name = "COL=VALUE", value_parser = parse_pair)]
        filters: Vec<(String, Value)>,
        /// Update every row; required when no --where is given
        #[arg(long, conflicts_with = "filters")]
        all: bool,
    },

    /// Delete matching rows and print how many went
    Delete {
        table: String,
        #[arg(short = 'w', long = "where", value_name = "COL=VALUE", value_parser = parse_pair)]
        filters: Vec<(String, Value)>,
        /// Delete every row; required when no --where is given
        #[arg(long, conflicts_with = "filters")]
        all: bool,
    },

    /// Print the number of matching rows
    Count {
        table: String,
        #[arg(short = 'w', long = "where", value_name = "COL=VALUE", value_parser = parse_pair)]
        filters: Vec<(String, Value)>,
    },
}

/// Split `col=value`. The value is read as a JSON scalar when it parses as
/// one (`5`, `1.5`, `true`, `null`, `"quoted"`), and as a plain string otherwise.
fn parse_pair(s: &str) -> Result<(String, Value), String> {
    let (col, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected COL=VALUE, got {s:?}"))?;
    let col = col.trim();
    if col.is_empty() {
        return Err("missing column name before '='".to_string());
    }
    let value = match serde_json::from_str::<Value>(raw) {
        Ok(v) if !v.is_array() && !v.is_object() => v,
        _ => Value::String(raw.to_string()),
    };
    Ok((col.to_string(), value))
}

fn config(cli: &Cli) -> Result<ConnectionConfig, DbError> {
    let mut cfg =
        ConnectionConfig::from_parts(Some(cli.backend.as_str()), cli.database.as_deref())?;
    if let Some(host) = &cli.host {
        cfg = cfg.set_host(host);
    }
    if let Some(port) = cli.port {
        cfg = cfg.set_port(port);
    }
    if let Some(user) = &cli.user {
        cfg = cfg.set_user(user);
    }
    if let Some(password) = &cli.password {
        cfg = cfg.set_password(password);
    }
    Ok(cfg)
}

fn run(cli: Cli) -> Result<(), DbError> {
    let mut db = DataAccess::new(config(&cli)?);
    let format = cli.format;

    match cli.command {
        Command::Exec { sql } => db.execute(&sql)?,
        Command::Select {
            table,
            filters,
            extra,
        } => {
            let rows = db.fetch_all(&table, &Fields::from_iter(filters), &extra)?;
            output::rows(&rows, format);
        }
        Command::Get { table, filters } => {
            let row = db.fetch_one(&table, &Fields::from_iter(filters))?;
            output::rows(row.as_slice(), format);
        }
        Command::Insert { table, fields } => {
            db.insert(&table, &Fields::from_iter(fields))?;
            if let Some(id) = db.last_insert_id() {
                println!("{id}");
            }
        }
        Command::Update {
            table,
            fields,
            filters,
            all,
        } => {
            let fields = Fields::from_iter(fields);
            let changed = if all {
                db.update_all(&table, &fields)?
            } else {
                db.update(&table, &fields, &Fields::from_iter(filters))?
            };
            println!("{changed}");
        }
        Command::Delete {
            table,
            filters,
            all,
        } => {
            let gone = if all {
                db.delete_all(&table)?
            } else {
                db.delete(&table, &Fields::from_iter(filters))?
            };
            println!("{gone}");
        }
        Command::Count { table, filters } => {
            println!("{}", db.count(&table, &Fields::from_iter(filters))?);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(backend = %cli.backend, command = ?cli.command, "starting");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            match e.kind() {
                ErrorKind::QueryExecution => ExitCode::from(1),
                ErrorKind::Configuration | ErrorKind::UnsupportedBackend => ExitCode::from(2),
            }
        }
    }
}

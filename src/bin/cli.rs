//! beanwire CLI Client
//!
//! Command-line interface for talking to a queue server.

use std::collections::BTreeMap;

use beanwire::{BeanError, Client, Config, Job, Stats};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

/// beanwire CLI
#[derive(Parser, Debug)]
#[command(name = "beanwire-cli")]
#[command(about = "CLI for beanstalkd-compatible work queues")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:11300")]
    server: String,

    /// Tube to use (for put, kick, peek-*) and watch (for reserve)
    #[arg(short, long, default_value = "default")]
    tube: String,

    /// Connect timeout in milliseconds
    #[arg(long, default_value = "5000")]
    connect_timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Put a job into the tube
    Put {
        /// Job body
        body: String,

        #[arg(short, long, default_value = "1024")]
        priority: u32,

        #[arg(short, long, default_value = "0")]
        delay: u32,

        #[arg(long, default_value = "60")]
        ttr: u32,
    },

    /// Reserve a job from the tube
    Reserve {
        /// Give up after this many seconds
        #[arg(long)]
        timeout: Option<u32>,
    },

    /// Delete a job
    Delete { id: u64 },

    /// Release a reserved job
    Release {
        id: u64,

        #[arg(short, long, default_value = "1024")]
        priority: u32,

        #[arg(short, long, default_value = "0")]
        delay: u32,
    },

    /// Bury a reserved job
    Bury {
        id: u64,

        #[arg(short, long, default_value = "1024")]
        priority: u32,
    },

    /// Kick buried or delayed jobs in the tube
    Kick {
        #[arg(default_value = "1")]
        bound: u32,
    },

    /// Show a job without reserving it
    Peek { id: u64 },

    /// Add the tube to the watch list and print the watch count
    Watch,

    /// Print server statistics
    Stats,

    /// Print statistics for the tube
    StatsTube,

    /// List all tubes
    ListTubes,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,beanwire=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .addr(&args.server)
        .connect_timeout_ms(args.connect_timeout_ms)
        .build();

    let client = match Client::connect(&config) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to connect to {}: {}", args.server, e);
            std::process::exit(1);
        }
    };

    let result = run(&client, &args.tube, args.command);
    client.close();

    if let Err(e) = result {
        if e.is_timed_out() {
            eprintln!("timed out");
            std::process::exit(2);
        }
        if e.is_not_found() {
            eprintln!("not found");
            std::process::exit(3);
        }
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(client: &Client, tube: &str, command: Commands) -> Result<(), BeanError> {
    match command {
        Commands::Put {
            body,
            priority,
            delay,
            ttr,
        } => {
            client.use_tube(tube)?;
            let id = client.put(priority, delay, ttr, body.as_bytes())?;
            println!("{id}");
        }
        Commands::Reserve { timeout } => {
            client.watch(tube)?;
            if tube != "default" {
                client.ignore("default")?;
            }
            let job = match timeout {
                Some(seconds) => client.reserve_with_timeout(seconds)?,
                None => client.reserve()?,
            };
            print_job(&job);
        }
        Commands::Delete { id } => client.delete(id)?,
        Commands::Release {
            id,
            priority,
            delay,
        } => client.release(id, priority, delay)?,
        Commands::Bury { id, priority } => client.bury(id, priority)?,
        Commands::Kick { bound } => {
            client.use_tube(tube)?;
            println!("{}", client.kick(bound)?);
        }
        Commands::Peek { id } => print_job(&client.peek(id)?),
        Commands::Watch => println!("{}", client.watch(tube)?),
        Commands::Stats => print_stats(client.stats()?),
        Commands::StatsTube => print_stats(client.stats_tube(tube)?),
        Commands::ListTubes => {
            for name in client.list_tubes()? {
                println!("{name}");
            }
        }
    }
    Ok(())
}

fn print_job(job: &Job) {
    println!("id: {}", job.id);
    println!("{}", String::from_utf8_lossy(&job.body));
}

fn print_stats(stats: Stats) {
    let sorted: BTreeMap<_, _> = stats.into_iter().collect();
    for (key, value) in sorted {
        println!("{key}: {value}");
    }
}

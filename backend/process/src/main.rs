use std::sync::Arc;

use clap::Parser;
use server::{database::RedisStore, repository::Database};

use seed::{SeedOptions, seed};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, env = "REDIS_URL", default_value = "redis://127.0.0.1:6379")]
    redis_url: String,

    #[arg(long, env = "ADMIN_EMAIL", default_value = "admin@cakebakery.com")]
    admin_email: String,

    #[arg(long, env = "ADMIN_PASSWORD", default_value = "admin123")]
    admin_password: String,

    #[arg(
        long,
        env = "BCRYPT_COST",
        default_value_t = 12,
        value_parser = clap::value_parser!(u32).range(4..=31)
    )]
    bcrypt_cost: u32,

    /// Add to the existing data instead of wiping cakes and users first.
    #[arg(long)]
    keep: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let store = RedisStore::connect(&args.redis_url).await?;
    println!("Connected to {}", args.redis_url);

    let db = Database::new(Arc::new(store));
    let options = SeedOptions {
        admin_email: args.admin_email,
        admin_password: args.admin_password,
        bcrypt_cost: args.bcrypt_cost,
        clear: !args.keep,
    };

    let report = seed(&db, &options).await?;

    println!("\nDatabase seeded successfully!");
    println!("Cakes created: {}", report.cakes);
    println!("\nAdmin credentials:");
    println!("Email: {}", options.admin_email);
    if report.admin_created {
        println!("Password: {}", options.admin_password);
    } else {
        println!("(already existed, password unchanged)");
    }

    Ok(())
}

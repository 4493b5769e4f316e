//! # Seeding
//!
//! Fills a fresh store with what the storefront needs on day one.
//!
//! 1. Unless `--keep` is passed, wipe the cake and user collections (and the
//!    email index with them). Orders are left alone.
//!
//! 2. Create the admin account. With `--keep` and an existing account under
//!    the same email, it is left untouched.
//!
//! 3. Insert the six sample cakes, validated exactly like an admin `POST`.
//!
//! Runs against the same [`Database`] the server uses, so any
//! [`DocumentStore`](server::store::DocumentStore) works.
use anyhow::{Context, bail};
use chrono::Utc;
use domain::{
    cakes::Cake,
    users::{Role, User, is_valid_email, normalize_email},
};
use server::{auth::hash_password, repository::Database, utils::new_id};

pub mod models;
pub mod utils;

use models::{ADMIN_NAME, sample_cakes};
use utils::{progress_bar, staggered};

pub struct SeedOptions {
    pub admin_email: String,
    pub admin_password: String,
    pub bcrypt_cost: u32,
    pub clear: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub struct SeedReport {
    pub admin_created: bool,
    pub cakes: usize,
}

pub async fn seed(db: &Database, options: &SeedOptions) -> anyhow::Result<SeedReport> {
    let email = normalize_email(&options.admin_email);
    if !is_valid_email(&email) {
        bail!("Admin email '{}' is not a valid email", options.admin_email);
    }

    if options.clear {
        db.clear::<Cake>().await.context("clearing cakes")?;
        db.clear_users().await.context("clearing users")?;
        println!("Cleared existing cakes and users");
    }

    let admin_created = create_admin(db, &email, options).await?;
    if admin_created {
        println!("Created admin user ({email})");
    } else {
        println!("Admin user {email} already exists, skipping");
    }

    let cakes = sample_cakes();
    let times = staggered(Utc::now(), cakes.len());
    let pb = progress_bar(cakes.len());

    let mut created = 0;
    for (new_cake, at) in cakes.into_iter().zip(times) {
        let cake = new_cake.into_cake(new_id(), at)?;
        pb.set_message(format!("Creating {}", cake.name));

        db.save(&cake)
            .await
            .with_context(|| format!("saving cake {}", cake.name))?;

        created += 1;
        pb.inc(1);
    }

    pb.finish_with_message("Done");

    Ok(SeedReport {
        admin_created,
        cakes: created,
    })
}

async fn create_admin(db: &Database, email: &str, options: &SeedOptions) -> anyhow::Result<bool> {
    if db.find_user_by_email(email).await?.is_some() {
        return Ok(false);
    }

    let now = Utc::now();
    let admin = User {
        id: new_id(),
        name: ADMIN_NAME.to_string(),
        email: email.to_string(),
        password_hash: hash_password(options.admin_password.clone(), options.bcrypt_cost).await?,
        role: Role::Admin,
        phone: None,
        address: None,
        created_at: now,
        updated_at: now,
    };

    Ok(db.insert_user(&admin).await?)
}

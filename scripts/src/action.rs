use clap::{Args, Parser, Subcommand};

use crate::{config, seed, utils};

#[derive(Args, Debug, Clone)]
pub struct RunMigrationsArgs {
    #[arg(short, long)]
    file: String,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Action {
    RunMigrations(RunMigrationsArgs),
    /// Doctor and pet owner sample accounts, existing usernames are skipped
    SeedUsers,
    /// Sample pets with their owners and vets, existing microchips are skipped
    SeedPets,
    /// Hashes passwords still stored as plaintext
    HashPasswords,
}

/// Operator tasks over the vet records database
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct AppArgs {
    #[command(subcommand)]
    pub action: Action,
}

impl AppArgs {
    pub async fn run(&self) -> anyhow::Result<()> {
        let db_pool = utils::setup_sqlite_db_pool(config::APP_CONFIG.is_prod()).await?;

        let report = match &self.action {
            Action::RunMigrations(RunMigrationsArgs { file }) => {
                return utils::run_migrations(&db_pool, file).await;
            }
            Action::SeedUsers => seed::seed_users(&db_pool, &seed::SAMPLE_USERS).await?,
            Action::SeedPets => seed::seed_pets(&db_pool, &seed::SAMPLE_PETS).await?,
            Action::HashPasswords => seed::hash_passwords(&db_pool).await?,
        };

        log::info!(
            "done, {} rows written, {} skipped",
            report.added,
            report.skipped
        );
        Ok(())
    }
}

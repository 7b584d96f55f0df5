//! Sample accounts and pet records for local and staging databases.
//!
//! Every seed skips what already exists, so running it twice is harmless.

use crate::utils;
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

pub struct SampleUser {
    pub username: &'static str,
    pub password: &'static str,
    pub user_type: &'static str,
}

pub const SAMPLE_USERS: [SampleUser; 5] = [
    SampleUser { username: "doctor1", password: "doctor123", user_type: "doctor" },
    SampleUser { username: "doctor2", password: "doctor456", user_type: "doctor" },
    SampleUser { username: "vet_admin", password: "admin123", user_type: "doctor" },
    SampleUser { username: "petowner1", password: "owner123", user_type: "pet-owner" },
    SampleUser { username: "petowner2", password: "owner456", user_type: "pet-owner" },
];

pub struct SamplePet {
    pub name: &'static str,
    pub pet_type: &'static str,
    pub race: &'static str,
    pub gender: &'static str,
    pub birthdate: &'static str,
    pub microchip_number: &'static str,
    pub completed_vaccinations: &'static str,
    pub scheduled_vaccinations: &'static str,
    pub allergy: &'static str,
    /// `(name, contact_number)`
    pub owner: (&'static str, &'static str),
    pub vet: (&'static str, &'static str),
}

const VET_AHMET: (&str, &str) = ("Dr. Veteriner Ahmet", "5551112233");
const VET_AYSE: (&str, &str) = ("Dr. Veteriner Ayşe", "5552223344");
const VET_MEHMET: (&str, &str) = ("Dr. Veteriner Mehmet", "5553334455");

pub const SAMPLE_PETS: [SamplePet; 8] = [
    SamplePet {
        name: "Max",
        pet_type: "Dog",
        race: "Golden Retriever",
        gender: "Male",
        birthdate: "2020-05-15",
        microchip_number: "DOG001",
        completed_vaccinations: "Rabies, DHPP, Bordatella",
        scheduled_vaccinations: "Rabies (2025-05-15)",
        allergy: "None",
        owner: ("Ahmet Yılmaz", "5321112233"),
        vet: VET_AHMET,
    },
    SamplePet {
        name: "Luna",
        pet_type: "Cat",
        race: "British Shorthair",
        gender: "Female",
        birthdate: "2019-03-20",
        microchip_number: "CAT001",
        completed_vaccinations: "FVRCP, Rabies",
        scheduled_vaccinations: "FVRCP (2025-03-20)",
        allergy: "Dairy products",
        owner: ("Ayşe Demir", "5332223344"),
        vet: VET_AYSE,
    },
    SamplePet {
        name: "Bella",
        pet_type: "Dog",
        race: "German Shepherd",
        gender: "Female",
        birthdate: "2021-08-10",
        microchip_number: "DOG002",
        completed_vaccinations: "Rabies, DHPP",
        scheduled_vaccinations: "DHPP (2025-08-10)",
        allergy: "Chicken",
        owner: ("Mehmet Kaya", "5343334455"),
        vet: VET_AHMET,
    },
    SamplePet {
        name: "Charlie",
        pet_type: "Cat",
        race: "Persian",
        gender: "Male",
        birthdate: "2020-11-25",
        microchip_number: "CAT002",
        completed_vaccinations: "FVRCP, Rabies, FeLV",
        scheduled_vaccinations: "Rabies (2025-11-25)",
        allergy: "None",
        owner: ("Fatma Şahin", "5354445566"),
        vet: VET_AYSE,
    },
    SamplePet {
        name: "Rocky",
        pet_type: "Dog",
        race: "Bulldog",
        gender: "Male",
        birthdate: "2019-07-08",
        microchip_number: "DOG003",
        completed_vaccinations: "Rabies, DHPP, Bordatella",
        scheduled_vaccinations: "Bordatella (2025-07-08)",
        allergy: "Grain",
        owner: ("Ali Öztürk", "5365556677"),
        vet: VET_MEHMET,
    },
    SamplePet {
        name: "Tweety",
        pet_type: "Bird",
        race: "Canary",
        gender: "Male",
        birthdate: "2022-01-12",
        microchip_number: "BRD001",
        completed_vaccinations: "None",
        scheduled_vaccinations: "Annual checkup (2025-01-12)",
        allergy: "None",
        owner: ("Zeynep Arslan", "5376667788"),
        vet: VET_AHMET,
    },
    SamplePet {
        name: "Milo",
        pet_type: "Cat",
        race: "Siamese",
        gender: "Male",
        birthdate: "2020-09-18",
        microchip_number: "CAT003",
        completed_vaccinations: "FVRCP, Rabies",
        scheduled_vaccinations: "FVRCP (2025-09-18)",
        allergy: "Fish",
        owner: ("Elif Çelik", "5398889900"),
        vet: VET_MEHMET,
    },
    SamplePet {
        name: "Bunny",
        pet_type: "Rabbit",
        race: "Holland Lop",
        gender: "Female",
        birthdate: "2022-06-05",
        microchip_number: "RBT001",
        completed_vaccinations: "None",
        scheduled_vaccinations: "Annual checkup (2025-06-05)",
        allergy: "None",
        owner: ("Burak Aydın", "5409990011"),
        vet: VET_AHMET,
    },
];

/// Added and skipped rows of a seed run
#[derive(Debug, Default, PartialEq)]
pub struct SeedReport {
    pub added: usize,
    pub skipped: usize,
}

pub async fn seed_users(db_pool: &SqlitePool, users: &[SampleUser]) -> anyhow::Result<SeedReport> {
    let mut report = SeedReport::default();

    for user in users {
        let exists: i64 =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM user_app WHERE username = $1);")
                .bind(user.username)
                .fetch_one(db_pool)
                .await?;
        if exists != 0 {
            log::info!("skipping {} - already exists", user.username);
            report.skipped += 1;
            continue;
        }

        let now = Utc::now();
        sqlx::query(
            "INSERT INTO user_app(username,password,user_type,created_at,updated_at) VALUES($1,$2,$3,$4,$5);",
        )
        .bind(user.username)
        .bind(utils::hash_password(user.password)?)
        .bind(user.user_type)
        .bind(now)
        .bind(now)
        .execute(db_pool)
        .await?;

        log::info!("added {} ({})", user.username, user.user_type);
        report.added += 1;
    }

    Ok(report)
}

/// Finds the owner/vet row with this exact identity or creates it
async fn find_or_create_contact(
    db_pool: &SqlitePool,
    table: &str,
    (name, contact_number): (&str, &str),
) -> anyhow::Result<i64> {
    let found: Option<i64> = sqlx::query_scalar(&format!(
        "SELECT id FROM {table} WHERE name = $1 AND contact_number = $2 ORDER BY id LIMIT 1;"
    ))
    .bind(name)
    .bind(contact_number)
    .fetch_optional(db_pool)
    .await?;

    if let Some(contact_id) = found {
        return Ok(contact_id);
    }

    let now = Utc::now();
    Ok(sqlx::query(&format!(
        "INSERT INTO {table}(name,contact_number,created_at,updated_at) VALUES($1,$2,$3,$4);"
    ))
    .bind(name)
    .bind(contact_number)
    .bind(now)
    .bind(now)
    .execute(db_pool)
    .await?
    .last_insert_rowid())
}

pub async fn seed_pets(db_pool: &SqlitePool, pets: &[SamplePet]) -> anyhow::Result<SeedReport> {
    let mut report = SeedReport::default();

    for pet in pets {
        let exists: i64 =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pet WHERE microchip_number = $1);")
                .bind(pet.microchip_number)
                .fetch_one(db_pool)
                .await?;
        if exists != 0 {
            log::info!(
                "skipping {} ({}) - already exists",
                pet.name,
                pet.microchip_number
            );
            report.skipped += 1;
            continue;
        }

        let owner_id = find_or_create_contact(db_pool, "pet_owner", pet.owner).await?;
        let vet_id = find_or_create_contact(db_pool, "vet", pet.vet).await?;
        let birthdate = NaiveDate::parse_from_str(pet.birthdate, "%Y-%m-%d")?;

        let now = Utc::now();
        sqlx::query(
            r#"INSERT INTO pet (
    name,pet_type,race,gender,birthdate,
    microchip_number,completed_vaccinations,scheduled_vaccinations,allergy,
    owner_id,vet_id,created_at,updated_at
) VALUES($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13);"#,
        )
        .bind(pet.name)
        .bind(pet.pet_type)
        .bind(pet.race)
        .bind(pet.gender)
        .bind(birthdate)
        .bind(pet.microchip_number)
        .bind(pet.completed_vaccinations)
        .bind(pet.scheduled_vaccinations)
        .bind(pet.allergy)
        .bind(owner_id)
        .bind(vet_id)
        .bind(now)
        .bind(now)
        .execute(db_pool)
        .await?;

        log::info!(
            "added {} ({} - {}) microchip: {}",
            pet.name,
            pet.pet_type,
            pet.race,
            pet.microchip_number
        );
        report.added += 1;
    }

    Ok(report)
}

/// Rewrites legacy plaintext passwords as Argon2 PHC strings
pub async fn hash_passwords(db_pool: &SqlitePool) -> anyhow::Result<SeedReport> {
    let mut report = SeedReport::default();

    let users: Vec<(i64, String, String)> =
        sqlx::query_as("SELECT id, username, password FROM user_app ORDER BY id;")
            .fetch_all(db_pool)
            .await?;

    for (user_id, username, password) in users {
        if utils::is_hashed(&password) {
            log::info!("skipping {username} - password already hashed");
            report.skipped += 1;
            continue;
        }

        sqlx::query("UPDATE user_app SET password = $2, updated_at = $3 WHERE id = $1;")
            .bind(user_id)
            .bind(utils::hash_password(&password)?)
            .bind(Utc::now())
            .execute(db_pool)
            .await?;

        log::info!("hashed password for {username}");
        report.added += 1;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::in_memory_pool;

    #[tokio::test]
    async fn test_seed_users_skips_existing_and_hashes() {
        let db_pool = in_memory_pool().await;

        let report = seed_users(&db_pool, &SAMPLE_USERS).await.unwrap();
        assert_eq!(report, SeedReport { added: 5, skipped: 0 });

        let report = seed_users(&db_pool, &SAMPLE_USERS).await.unwrap();
        assert_eq!(report, SeedReport { added: 0, skipped: 5 });

        let password: String =
            sqlx::query_scalar("SELECT password FROM user_app WHERE username = 'doctor1';")
                .fetch_one(&db_pool)
                .await
                .unwrap();
        assert!(utils::is_hashed(&password));
    }

    #[tokio::test]
    async fn test_seed_pets_shares_vets() {
        let db_pool = in_memory_pool().await;

        let report = seed_pets(&db_pool, &SAMPLE_PETS).await.unwrap();
        assert_eq!(report.added, SAMPLE_PETS.len());

        let vets: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vet;")
            .fetch_one(&db_pool)
            .await
            .unwrap();
        assert_eq!(vets, 3);

        let report = seed_pets(&db_pool, &SAMPLE_PETS).await.unwrap();
        assert_eq!(report.skipped, SAMPLE_PETS.len());
    }

    #[tokio::test]
    async fn test_hash_passwords_only_touches_plaintext() {
        let db_pool = in_memory_pool().await;
        seed_users(&db_pool, &SAMPLE_USERS[..1]).await.unwrap();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO user_app(username,password,user_type,created_at,updated_at) VALUES('legacy','plain123','doctor',$1,$1);",
        )
        .bind(now)
        .execute(&db_pool)
        .await
        .unwrap();

        let report = hash_passwords(&db_pool).await.unwrap();

        assert_eq!(report, SeedReport { added: 1, skipped: 1 });
        let password: String =
            sqlx::query_scalar("SELECT password FROM user_app WHERE username = 'legacy';")
                .fetch_one(&db_pool)
                .await
                .unwrap();
        assert!(utils::is_hashed(&password));
    }
}

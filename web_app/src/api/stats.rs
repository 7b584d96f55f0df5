//! Dashboard statistics computed from one scan of the pet table.
//!
//! The vaccination buckets are independent counts, not a partition of the
//! total: a pet with both fields filled is counted as completed and scheduled.

use crate::{
    consts,
    front::errors::ApiError,
    models::{
        self,
        pet::{PetStatRow, PetType},
    },
    repo,
};
use serde::Serialize;

#[derive(Debug, Serialize, PartialEq)]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub pet_type: PetType,
    pub count: usize,
}

#[derive(Debug, Default, Serialize, PartialEq)]
pub struct VaccinationStats {
    pub total: usize,
    pub completed: usize,
    pub scheduled: usize,
    pub pending: usize,
}

#[derive(Debug, Default, Serialize, PartialEq)]
pub struct AllergyStats {
    pub total: usize,
    pub with_allergy: usize,
    pub no_allergy: usize,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct AllergyCount {
    pub allergy: String,
    pub count: usize,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_pets: usize,
    pub type_distribution: Vec<TypeCount>,
    pub vaccination: VaccinationStats,
    pub allergy: AllergyStats,
    pub allergy_details: Vec<AllergyCount>,
    pub recent_pets: Vec<models::pet::PetDetails>,
}

fn is_filled(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Counts keys keeping first-seen order, then sorts by count descending.
/// The sort is stable so ties keep the scan order.
fn count_sorted<K: PartialEq>(keys: impl Iterator<Item = K>) -> Vec<(K, usize)> {
    let mut counts: Vec<(K, usize)> = Vec::new();
    for key in keys {
        match counts.iter_mut().find(|(k, _)| *k == key) {
            Some((_, count)) => *count += 1,
            None => counts.push((key, 1)),
        }
    }

    counts.sort_by(|(_, a), (_, b)| b.cmp(a));
    counts
}

fn type_distribution(rows: &[PetStatRow]) -> Vec<TypeCount> {
    count_sorted(rows.iter().map(|row| row.pet_type))
        .into_iter()
        .map(|(pet_type, count)| TypeCount { pet_type, count })
        .collect()
}

fn vaccination_stats(rows: &[PetStatRow]) -> VaccinationStats {
    rows.iter().fold(
        VaccinationStats::default(),
        |mut stats, row| {
            let completed = is_filled(&row.completed_vaccinations);
            let scheduled = is_filled(&row.scheduled_vaccinations);

            stats.total += 1;
            stats.completed += usize::from(completed);
            stats.scheduled += usize::from(scheduled);
            stats.pending += usize::from(!completed && !scheduled);
            stats
        },
    )
}

fn allergy_stats(rows: &[PetStatRow]) -> AllergyStats {
    let with_allergy = rows.iter().filter(|row| is_filled(&row.allergy)).count();

    AllergyStats {
        total: rows.len(),
        with_allergy,
        no_allergy: rows.len() - with_allergy,
    }
}

fn allergy_details(rows: &[PetStatRow]) -> Vec<AllergyCount> {
    count_sorted(
        rows.iter()
            .map(|row| row.allergy.trim())
            .filter(|allergy| !allergy.is_empty()),
    )
    .into_iter()
    .take(consts::STATS_TOP_ALLERGIES)
    .map(|(allergy, count)| AllergyCount {
        allergy: allergy.to_string(),
        count,
    })
    .collect()
}

pub fn aggregate_stats(
    rows: &[PetStatRow],
    recent_pets: Vec<models::pet::PetDetails>,
) -> DashboardStats {
    DashboardStats {
        total_pets: rows.len(),
        type_distribution: type_distribution(rows),
        vaccination: vaccination_stats(rows),
        allergy: allergy_stats(rows),
        allergy_details: allergy_details(rows),
        recent_pets,
    }
}

/// Whole snapshot or an error, never a partial result
pub async fn get_dashboard_stats(repo: &repo::ImplAppRepo) -> Result<DashboardStats, ApiError> {
    let _span = logfire::span!("get_dashboard_stats").entered();

    let rows = repo.get_pet_stat_rows().await?;
    let recent_pets = repo.get_recent_pet_details(consts::STATS_RECENT_PETS).await?;

    Ok(aggregate_stats(&rows, recent_pets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::MockAppRepo;
    use mockall::predicate::*;

    fn row(pet_type: PetType, completed: &str, scheduled: &str, allergy: &str) -> PetStatRow {
        PetStatRow {
            pet_type,
            completed_vaccinations: completed.into(),
            scheduled_vaccinations: scheduled.into(),
            allergy: allergy.into(),
        }
    }

    #[test]
    fn test_total_equals_sum_of_type_distribution() {
        let rows = vec![
            row(PetType::Cat, "", "", ""),
            row(PetType::Dog, "", "", ""),
            row(PetType::Dog, "", "", ""),
            row(PetType::Bird, "", "", ""),
            row(PetType::Other, "", "", ""),
        ];

        let stats = aggregate_stats(&rows, vec![]);

        assert_eq!(
            stats.total_pets,
            stats.type_distribution.iter().map(|t| t.count).sum::<usize>()
        );
        assert_eq!(
            stats.type_distribution,
            vec![
                TypeCount { pet_type: PetType::Dog, count: 2 },
                TypeCount { pet_type: PetType::Cat, count: 1 },
                TypeCount { pet_type: PetType::Bird, count: 1 },
                TypeCount { pet_type: PetType::Other, count: 1 },
            ]
        );
    }

    #[test]
    fn test_vaccination_buckets_are_not_a_partition() {
        let overlapping = vec![
            row(PetType::Dog, "rabies", "parvo", ""),
            row(PetType::Cat, "fvrcp", "rabies", ""),
        ];
        let stats = aggregate_stats(&overlapping, vec![]).vaccination;
        assert_eq!(
            stats,
            VaccinationStats { total: 2, completed: 2, scheduled: 2, pending: 0 }
        );
        assert!(stats.completed + stats.scheduled + stats.pending > stats.total);

        let one_sided = vec![
            row(PetType::Dog, "rabies", "", ""),
            row(PetType::Dog, "", "", ""),
            row(PetType::Cat, "", "parvo", ""),
        ];
        let stats = aggregate_stats(&one_sided, vec![]).vaccination;
        assert_eq!(
            stats,
            VaccinationStats { total: 3, completed: 1, scheduled: 1, pending: 1 }
        );
    }

    #[test]
    fn test_allergy_details_top_ten_with_stable_ties() {
        let mut rows: Vec<PetStatRow> = (0..12)
            .map(|i| row(PetType::Dog, "", "", &format!("allergy-{i}")))
            .collect();
        rows.push(row(PetType::Cat, "", "", "allergy-11"));
        rows.push(row(PetType::Cat, "", "", " "));

        let stats = aggregate_stats(&rows, vec![]);

        assert_eq!(
            stats.allergy,
            AllergyStats { total: 14, with_allergy: 13, no_allergy: 1 }
        );
        assert_eq!(stats.allergy_details.len(), 10);
        assert_eq!(
            stats.allergy_details[0],
            AllergyCount { allergy: "allergy-11".into(), count: 2 }
        );
        assert_eq!(stats.allergy_details[1].allergy, "allergy-0");
        assert_eq!(stats.allergy_details[9].allergy, "allergy-8");
    }

    #[test]
    fn test_empty_collection() {
        let stats = aggregate_stats(&[], vec![]);

        assert_eq!(stats.total_pets, 0);
        assert!(stats.type_distribution.is_empty());
        assert_eq!(stats.vaccination, VaccinationStats::default());
        assert!(stats.allergy_details.is_empty());
    }

    #[test]
    fn test_serialized_keys() {
        let value = serde_json::to_value(aggregate_stats(&[row(PetType::Dog, "", "", "")], vec![]))
            .unwrap();

        assert_eq!(value["totalPets"], 1);
        assert_eq!(value["typeDistribution"][0]["type"], "Dog");
        assert_eq!(value["allergy"]["no_allergy"], 1);
        assert!(value["allergyDetails"].is_array());
        assert!(value["recentPets"].is_array());
    }

    #[ntex::test]
    async fn test_recent_pets_are_the_five_newest_with_contact_names() {
        let repo: repo::ImplAppRepo = Box::new(crate::repo::sqlite::in_memory_repo().await);
        for i in 0..7 {
            crate::api::pet::create_pet(
                &crate::front::forms::pet::PetRecordForm {
                    pet_name: format!("pet-{i}"),
                    pet_type: "Dog".into(),
                    pet_owner_name: "Ahmet".into(),
                    vet_name: "Dr. Kaya".into(),
                    ..Default::default()
                },
                &repo,
            )
            .await
            .unwrap();
        }

        let stats = get_dashboard_stats(&repo).await.unwrap();

        assert_eq!(stats.total_pets, 7);
        let recent: Vec<(&str, &str, &str)> = stats
            .recent_pets
            .iter()
            .map(|p| (p.name.as_str(), p.owner_name.as_str(), p.vet_name.as_str()))
            .collect();
        assert_eq!(
            recent,
            vec![
                ("pet-6", "Ahmet", "Dr. Kaya"),
                ("pet-5", "Ahmet", "Dr. Kaya"),
                ("pet-4", "Ahmet", "Dr. Kaya"),
                ("pet-3", "Ahmet", "Dr. Kaya"),
                ("pet-2", "Ahmet", "Dr. Kaya"),
            ]
        );
    }

    #[ntex::test]
    async fn test_any_failure_fails_the_whole_snapshot() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_get_pet_stat_rows()
            .times(1)
            .returning(|| Ok(vec![row(PetType::Dog, "", "", "")]));
        mock_repo
            .expect_get_recent_pet_details()
            .with(eq(consts::STATS_RECENT_PETS))
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("database is locked")));
        let repo: repo::ImplAppRepo = Box::new(mock_repo);

        assert_eq!(
            get_dashboard_stats(&repo).await,
            Err(ApiError::StoreFailure("database is locked".into()))
        );
    }
}

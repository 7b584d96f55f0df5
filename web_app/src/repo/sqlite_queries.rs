pub const QUERY_GET_USER_BY_USERNAME: &str = r#"
SELECT id,username,password,user_type,created_at,updated_at
FROM user_app
WHERE username=$1;
"#;

pub const QUERY_FIND_PET_OWNER: &str = r#"
SELECT id,name,contact_number,created_at,updated_at
FROM pet_owner
WHERE name=$1 AND contact_number=$2
ORDER BY id
LIMIT 1;
"#;

pub const QUERY_FIND_VET: &str = r#"
SELECT id,name,contact_number,created_at,updated_at
FROM vet
WHERE name=$1 AND contact_number=$2
ORDER BY id
LIMIT 1;
"#;

pub const QUERY_INSERT_PET_OWNER: &str = r#"
INSERT INTO pet_owner(name,contact_number,created_at,updated_at)
VALUES($1,$2,$3,$4)
RETURNING id,name,contact_number,created_at,updated_at;
"#;

pub const QUERY_INSERT_VET: &str = r#"
INSERT INTO vet(name,contact_number,created_at,updated_at)
VALUES($1,$2,$3,$4)
RETURNING id,name,contact_number,created_at,updated_at;
"#;

pub const QUERY_GET_PET_OWNER_BY_ID: &str =
    "SELECT id,name,contact_number,created_at,updated_at FROM pet_owner WHERE id=$1;";

pub const QUERY_GET_VET_BY_ID: &str =
    "SELECT id,name,contact_number,created_at,updated_at FROM vet WHERE id=$1;";

pub const QUERY_UPDATE_PET_OWNER: &str =
    "UPDATE pet_owner SET name=$2,contact_number=$3,updated_at=$4 WHERE id=$1;";

pub const QUERY_UPDATE_VET: &str =
    "UPDATE vet SET name=$2,contact_number=$3,updated_at=$4 WHERE id=$1;";

pub const QUERY_DELETE_PET_OWNER: &str = "DELETE FROM pet_owner WHERE id=$1;";

pub const QUERY_DELETE_VET: &str = "DELETE FROM vet WHERE id=$1;";

pub const QUERY_IS_PET_OWNER_REFERENCED: &str =
    "SELECT EXISTS(SELECT 1 FROM pet WHERE owner_id=$1);";

pub const QUERY_IS_VET_REFERENCED: &str = "SELECT EXISTS(SELECT 1 FROM pet WHERE vet_id=$1);";

pub const QUERY_INSERT_PET: &str = r#"
INSERT INTO pet (
    name,pet_type,race,gender,birthdate,
    microchip_number,completed_vaccinations,scheduled_vaccinations,allergy,
    owner_id,vet_id,created_at,updated_at
) VALUES(
    $1,$2,$3,$4,$5,
    $6,$7,$8,$9,
    $10,$11,$12,$13
);
"#;

pub const QUERY_UPDATE_PET: &str = r#"
UPDATE pet SET
    name=$2,pet_type=$3,race=$4,gender=$5,birthdate=$6,
    microchip_number=$7,completed_vaccinations=$8,scheduled_vaccinations=$9,allergy=$10,
    vet_id=$11,updated_at=$12
WHERE id=$1;
"#;

pub const QUERY_DELETE_PET: &str = "DELETE FROM pet WHERE id=$1;";

pub const QUERY_GET_PET_BY_ID: &str = r#"
SELECT
    id,name,pet_type,race,gender,birthdate,
    microchip_number,completed_vaccinations,scheduled_vaccinations,allergy,
    owner_id,vet_id,created_at,updated_at
FROM pet
WHERE id=$1;
"#;

const PET_DETAILS_SELECT: &str = r#"
SELECT
    p.id,p.name,p.pet_type,p.race,p.gender,p.birthdate,
    p.microchip_number,p.completed_vaccinations,p.scheduled_vaccinations,p.allergy,
    p.owner_id,p.vet_id,p.created_at,p.updated_at,
    COALESCE(po.name,'') AS owner_name,
    COALESCE(po.contact_number,'') AS owner_contact,
    COALESCE(v.name,'') AS vet_name,
    COALESCE(v.contact_number,'') AS vet_contact
FROM pet AS p
LEFT JOIN pet_owner AS po ON (po.id = p.owner_id)
LEFT JOIN vet AS v ON (v.id = p.vet_id)
"#;

pub fn query_get_pet_details_by_id() -> String {
    format!("{PET_DETAILS_SELECT} WHERE p.id=$1;")
}

/// The microchip is not unique, the oldest record wins
pub fn query_get_pet_details_by_microchip() -> String {
    format!("{PET_DETAILS_SELECT} WHERE p.microchip_number=$1 ORDER BY p.id LIMIT 1;")
}

pub fn query_get_all_pet_details() -> String {
    format!("{PET_DETAILS_SELECT} ORDER BY p.id;")
}

pub fn query_get_recent_pet_details() -> String {
    format!("{PET_DETAILS_SELECT} ORDER BY p.created_at DESC, p.id DESC LIMIT $1;")
}

pub const QUERY_GET_PET_STAT_ROWS: &str = r#"
SELECT pet_type,completed_vaccinations,scheduled_vaccinations,allergy
FROM pet
ORDER BY id;
"#;

pub const QUERY_GET_CHAT_HISTORY: &str = r#"
SELECT id,microchip_number,sender,message,created_at
FROM chat_message
WHERE microchip_number=$1
ORDER BY created_at, id;
"#;

pub const QUERY_GET_LATEST_CHAT_MESSAGES: &str = r#"
SELECT id,microchip_number,sender,message,created_at FROM (
    SELECT id,microchip_number,sender,message,created_at
    FROM chat_message
    WHERE microchip_number=$1
    ORDER BY created_at DESC, id DESC
    LIMIT $2
)
ORDER BY created_at, id;
"#;

pub const QUERY_INSERT_CHAT_MESSAGE: &str = r#"
INSERT INTO chat_message(microchip_number,sender,message,created_at)
VALUES($1,$2,$3,$4)
RETURNING id,microchip_number,sender,message,created_at;
"#;

pub const QUERY_INSERT_DOCTOR_MESSAGE: &str = r#"
INSERT INTO doctor_message(
    microchip_number,owner_name,owner_contact,pet_name,pet_type,
    summary,pet_info,status,read_at,created_at,updated_at
) VALUES($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11);
"#;

pub const QUERY_GET_PENDING_DOCTOR_MESSAGES: &str = r#"
SELECT
    id,microchip_number,owner_name,owner_contact,pet_name,pet_type,
    summary,pet_info,status,read_at,created_at,updated_at
FROM doctor_message
WHERE status='pending'
ORDER BY created_at DESC, id DESC;
"#;

pub const QUERY_MARK_DOCTOR_MESSAGE_READ: &str = r#"
UPDATE doctor_message SET
    status='read',
    read_at=COALESCE(read_at,$2),
    updated_at=$2
WHERE id=$1;
"#;

//! Room table capability record.
//!
//! Deployed databases carry rooms tables from several schema generations.
//! The logical `name` and `description` fields live under one of three
//! physical columns each, and `property_id`, `is_active` and `sort_order`
//! may be missing altogether. [`RoomSchema`] captures which shape is live,
//! resolved once at startup from a column-existence check, so the read and
//! write paths never branch on raw column names.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Column identities
// ---------------------------------------------------------------------------

/// Physical column holding a room's display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NameColumn {
    Name,
    RoomName,
    Title,
}

impl NameColumn {
    /// Candidates in preference order.
    pub const CANDIDATES: [NameColumn; 3] =
        [NameColumn::Name, NameColumn::RoomName, NameColumn::Title];

    pub fn as_str(self) -> &'static str {
        match self {
            NameColumn::Name => "name",
            NameColumn::RoomName => "room_name",
            NameColumn::Title => "title",
        }
    }
}

/// Physical column holding a room's description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptionColumn {
    Description,
    RoomDescription,
    Details,
}

impl DescriptionColumn {
    /// Candidates in preference order.
    pub const CANDIDATES: [DescriptionColumn; 3] = [
        DescriptionColumn::Description,
        DescriptionColumn::RoomDescription,
        DescriptionColumn::Details,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DescriptionColumn::Description => "description",
            DescriptionColumn::RoomDescription => "room_description",
            DescriptionColumn::Details => "details",
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// The live schema cannot back the room aggregate. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("table `{table}` has none of the columns {candidates:?} for its {field} field")]
    MissingColumn {
        table: &'static str,
        field: &'static str,
        candidates: Vec<&'static str>,
    },
}

// ---------------------------------------------------------------------------
// Capability record
// ---------------------------------------------------------------------------

pub const ROOMS_TABLE: &str = "rooms";
pub const ROOM_IMAGES_TABLE: &str = "room_images";

/// Which optional columns the rooms and room_images tables carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoomSchema {
    pub name: NameColumn,
    pub description: DescriptionColumn,
    pub property_id: bool,
    pub is_active: bool,
    pub sort_order: bool,
    /// Whether `room_images.sort_order` exists.
    pub image_sort_order: bool,
}

impl RoomSchema {
    /// The current migration generation.
    pub const CANONICAL: RoomSchema = RoomSchema {
        name: NameColumn::Name,
        description: DescriptionColumn::Description,
        property_id: true,
        is_active: true,
        sort_order: true,
        image_sort_order: true,
    };

    /// Resolve the record from a column-existence check for each table.
    pub fn from_columns(
        has_room_column: impl Fn(&str) -> bool,
        has_image_column: impl Fn(&str) -> bool,
    ) -> Result<Self, SchemaError> {
        let name = NameColumn::CANDIDATES
            .into_iter()
            .find(|c| has_room_column(c.as_str()))
            .ok_or_else(|| SchemaError::MissingColumn {
                table: ROOMS_TABLE,
                field: "name",
                candidates: NameColumn::CANDIDATES.iter().map(|c| c.as_str()).collect(),
            })?;

        let description = DescriptionColumn::CANDIDATES
            .into_iter()
            .find(|c| has_room_column(c.as_str()))
            .ok_or_else(|| SchemaError::MissingColumn {
                table: ROOMS_TABLE,
                field: "description",
                candidates: DescriptionColumn::CANDIDATES
                    .iter()
                    .map(|c| c.as_str())
                    .collect(),
            })?;

        Ok(Self {
            name,
            description,
            property_id: has_room_column("property_id"),
            is_active: has_room_column("is_active"),
            sort_order: has_room_column("sort_order"),
            image_sort_order: has_image_column("sort_order"),
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn member_of<'a>(cols: &'a [&'a str]) -> impl Fn(&str) -> bool + 'a {
        move |c: &str| cols.iter().any(|col| *col == c)
    }

    #[test]
    fn canonical_columns_resolve_to_canonical_record() {
        let rooms = [
            "id",
            "property_id",
            "name",
            "description",
            "is_active",
            "sort_order",
        ];
        let images = ["id", "room_id", "image_path", "sort_order"];
        let schema = RoomSchema::from_columns(member_of(&rooms), member_of(&images)).unwrap();
        assert_eq!(schema, RoomSchema::CANONICAL);
    }

    #[test]
    fn legacy_columns_resolve_in_preference_order() {
        let rooms = ["id", "room_name", "title", "room_description", "details"];
        let schema = RoomSchema::from_columns(member_of(&rooms), member_of(&["id"])).unwrap();
        assert_eq!(schema.name, NameColumn::RoomName);
        assert_eq!(schema.description, DescriptionColumn::RoomDescription);
        assert!(!schema.property_id);
        assert!(!schema.is_active);
        assert!(!schema.sort_order);
        assert!(!schema.image_sort_order);
    }

    #[test]
    fn last_candidate_is_used_when_alone() {
        let rooms = ["title", "details"];
        let schema = RoomSchema::from_columns(member_of(&rooms), member_of(&[])).unwrap();
        assert_eq!(schema.name, NameColumn::Title);
        assert_eq!(schema.description, DescriptionColumn::Details);
    }

    #[test]
    fn missing_name_column_is_fatal() {
        let rooms = ["id", "description"];
        let result = RoomSchema::from_columns(member_of(&rooms), member_of(&[]));
        assert_matches!(
            result,
            Err(SchemaError::MissingColumn { field: "name", .. })
        );
    }

    #[test]
    fn missing_description_column_is_fatal() {
        let rooms = ["id", "name"];
        let result = RoomSchema::from_columns(member_of(&rooms), member_of(&[]));
        assert_matches!(
            result,
            Err(SchemaError::MissingColumn { field: "description", .. })
        );
    }
}

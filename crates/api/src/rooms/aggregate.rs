//! The room aggregate: a room row plus its ordered, bounded image set.
//!
//! Row mutations for one request run in a single transaction. Blobs are not
//! transactional, so they are sequenced around the rows: new blobs are
//! written before the rows that reference them, and old blobs are deleted
//! before the rows that referenced them. A failure after a blob write leaves
//! an unreferenced blob at worst, which is cleaned up best-effort.
//!
//! Update and delete lock the room row first, so two writers on the same room
//! serialise their image-set changes and the three-image bound holds. Scalar
//! fields remain last-commit-wins.

use sqlx::PgPool;
use staydesk_core::blob::BlobStore;
use staydesk_core::error::CoreError;
use staydesk_core::fields::{invalid_selection, not_image, FieldErrors};
use staydesk_core::room::{
    check_image_count, check_room_fields, check_room_image, RoomFields, WriteMode,
    MAX_ROOM_IMAGES, ROOM_IMAGE_DIR,
};
use staydesk_core::room_schema::RoomSchema;
use staydesk_core::types::DbId;
use staydesk_db::models::room::{CreateRoom, RoomImage, UpdateRoom};
use staydesk_db::repositories::{PropertyRepo, RoomImageRepo, RoomRepo};

use crate::error::{AppError, AppResult};
use crate::form::{FilePart, FormData};
use crate::rooms::view::RoomView;
use crate::state::AppState;
use crate::uploads::{discard_blob, AcceptedImage};

fn room_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Room", id })
}

/// A validated create or update request.
struct RoomInput<'f> {
    fields: RoomFields,
    /// `None` when the request did not mention `images`.
    images: Option<Vec<AcceptedImage<'f>>>,
}

/// Room operations bound to one request's handles.
pub struct RoomAggregate<'a> {
    pool: &'a PgPool,
    schema: RoomSchema,
    blobs: &'a dyn BlobStore,
}

impl<'a> RoomAggregate<'a> {
    pub fn new(pool: &'a PgPool, schema: RoomSchema, blobs: &'a dyn BlobStore) -> Self {
        Self {
            pool,
            schema,
            blobs,
        }
    }

    pub fn from_state(state: &'a AppState) -> Self {
        Self::new(&state.pool, state.room_schema, state.blobs.as_ref())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Every room with its images, rooms by `sort_order` then newest first.
    pub async fn list(&self) -> AppResult<Vec<RoomView>> {
        let rooms = RoomRepo::list(self.pool, &self.schema).await?;
        let ids: Vec<DbId> = rooms.iter().map(|r| r.id).collect();
        let images = RoomImageRepo::list_for_rooms(self.pool, &self.schema, &ids).await?;
        Ok(RoomView::assemble(rooms, images, self.blobs))
    }

    /// Rooms attached to one property, in listing order.
    pub async fn list_for_property(&self, property_id: DbId) -> AppResult<Vec<RoomView>> {
        if !PropertyRepo::exists(self.pool, property_id).await? {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Property",
                id: property_id,
            }));
        }
        let rooms = RoomRepo::list_for_property(self.pool, &self.schema, property_id).await?;
        let ids: Vec<DbId> = rooms.iter().map(|r| r.id).collect();
        let images = RoomImageRepo::list_for_rooms(self.pool, &self.schema, &ids).await?;
        Ok(RoomView::assemble(rooms, images, self.blobs))
    }

    pub async fn read(&self, id: DbId) -> AppResult<RoomView> {
        let room = RoomRepo::find_by_id(self.pool, &self.schema, id)
            .await?
            .ok_or_else(|| room_not_found(id))?;
        let images = RoomImageRepo::list_for_room(self.pool, &self.schema, id).await?;
        Ok(RoomView::new(room, images, self.blobs))
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Create a room with one to three images.
    pub async fn create(&self, form: &FormData) -> AppResult<RoomView> {
        let input = self.validate(form, WriteMode::Create).await?;

        let mut written = Vec::new();
        let result = self.insert(&input, &mut written).await;
        if result.is_err() {
            self.discard_written(&written).await;
        }
        result
    }

    /// Patch a room. Mentioning `images` replaces the whole set.
    pub async fn update(&self, id: DbId, form: &FormData) -> AppResult<RoomView> {
        if RoomRepo::find_by_id(self.pool, &self.schema, id)
            .await?
            .is_none()
        {
            return Err(room_not_found(id));
        }
        let input = self.validate(form, WriteMode::Update).await?;

        let mut written = Vec::new();
        let result = self.patch(id, &input, &mut written).await;
        if result.is_err() {
            self.discard_written(&written).await;
        }
        result
    }

    /// Delete a room, its image blobs and its image rows.
    pub async fn delete(&self, id: DbId) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        if !RoomRepo::lock_by_id(&mut *tx, id).await? {
            return Err(room_not_found(id));
        }

        let images = RoomImageRepo::list_for_room(&mut *tx, &self.schema, id).await?;
        self.discard_images(&images).await;
        // Rows go explicitly even where the cascade exists.
        RoomImageRepo::delete_for_room(&mut *tx, id).await?;
        RoomRepo::delete(&mut *tx, id).await?;
        tx.commit().await?;

        tracing::info!(room_id = id, images = images.len(), "Room deleted");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    async fn insert(&self, input: &RoomInput<'_>, written: &mut Vec<String>) -> AppResult<RoomView> {
        for image in input.images.iter().flatten() {
            written.push(self.store(image).await?);
        }

        let fields = &input.fields;
        let mut tx = self.pool.begin().await?;
        let room = RoomRepo::create(
            &mut *tx,
            &self.schema,
            &CreateRoom {
                property_id: fields.property_id.flatten(),
                name: fields.name.clone().unwrap_or_default(),
                description: fields.description.clone().unwrap_or_default(),
                is_active: fields.is_active.unwrap_or(true),
                sort_order: fields.sort_order.unwrap_or(0),
            },
        )
        .await?;
        let images = self.insert_image_rows(&mut tx, room.id, &written[..]).await?;
        tx.commit().await?;

        tracing::info!(room_id = room.id, images = images.len(), "Room created");
        Ok(RoomView::new(room, images, self.blobs))
    }

    async fn patch(
        &self,
        id: DbId,
        input: &RoomInput<'_>,
        written: &mut Vec<String>,
    ) -> AppResult<RoomView> {
        let mut tx = self.pool.begin().await?;
        // Deleted between the existence check and here.
        if !RoomRepo::lock_by_id(&mut *tx, id).await? {
            return Err(room_not_found(id));
        }

        let fields = &input.fields;
        let patch = UpdateRoom {
            property_id: fields.property_id,
            name: fields.name.clone(),
            description: fields.description.clone(),
            is_active: fields.is_active,
            sort_order: fields.sort_order,
        };
        let room = RoomRepo::update(&mut *tx, &self.schema, id, &patch)
            .await?
            .ok_or_else(|| room_not_found(id))?;

        let images = match &input.images {
            None => RoomImageRepo::list_for_room(&mut *tx, &self.schema, id).await?,
            Some(replacements) => {
                let old = RoomImageRepo::list_for_room(&mut *tx, &self.schema, id).await?;
                self.discard_images(&old).await;
                RoomImageRepo::delete_for_room(&mut *tx, id).await?;

                for image in replacements {
                    written.push(self.store(image).await?);
                }
                let images = self.insert_image_rows(&mut tx, id, &written[..]).await?;
                tracing::info!(
                    room_id = id,
                    removed = old.len(),
                    added = images.len(),
                    "Room image set replaced"
                );
                images
            }
        };
        tx.commit().await?;

        Ok(RoomView::new(room, images, self.blobs))
    }

    async fn store(&self, image: &AcceptedImage<'_>) -> AppResult<String> {
        image.store(self.blobs, ROOM_IMAGE_DIR).await
    }

    /// One row per path, `sort_order` following submission position.
    async fn insert_image_rows(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        room_id: DbId,
        paths: &[String],
    ) -> AppResult<Vec<RoomImage>> {
        let mut images = Vec::with_capacity(paths.len());
        for (index, path) in (0i32..).zip(paths) {
            images.push(RoomImageRepo::create(&mut **tx, &self.schema, room_id, path, index).await?);
        }
        Ok(images)
    }

    /// Best-effort removal of the blobs behind `images`. Failures are logged
    /// and skipped.
    async fn discard_images(&self, images: &[RoomImage]) {
        for image in images {
            discard_blob(self.blobs, &image.image_path).await;
        }
    }

    /// Best-effort removal of blobs this request wrote before failing.
    async fn discard_written(&self, paths: &[String]) {
        for path in paths {
            discard_blob(self.blobs, path).await;
        }
    }

    /// Collect every problem with the request, then reject or return it.
    async fn validate<'f>(&self, form: &'f FormData, mode: WriteMode) -> AppResult<RoomInput<'f>> {
        let mut errors = FieldErrors::new();

        let fields = RoomFields {
            name: form.text("name", &mut errors),
            description: form.text("description", &mut errors),
            property_id: form.nullable_id("property_id", &mut errors),
            is_active: form.boolean("is_active", &mut errors),
            sort_order: form.small_integer("sort_order", &mut errors),
        };
        check_room_fields(&fields, mode, &mut errors);

        // `None` leaves the image set untouched.
        let parts = form.file_parts("images");
        let submitted = parts.unwrap_or_default();
        check_image_count(submitted.len(), parts.is_some(), mode, &mut errors);

        let mut accepted = Vec::with_capacity(submitted.len());
        if submitted.len() <= MAX_ROOM_IMAGES {
            for (index, part) in submitted.iter().enumerate() {
                let file = match part {
                    FilePart::File(file) => file,
                    FilePart::NotAFile => {
                        let key = format!("images.{index}");
                        errors.add(key.clone(), not_image(&key));
                        continue;
                    }
                };
                if let Some(kind) =
                    check_room_image(index, file.file_name.as_deref(), &file.bytes, &mut errors)
                {
                    accepted.push(AcceptedImage {
                        kind,
                        bytes: &file.bytes,
                    });
                }
            }
        }

        if let Some(Some(property_id)) = fields.property_id {
            if !PropertyRepo::exists(self.pool, property_id).await? {
                errors.add("property_id", invalid_selection("property_id"));
            }
        }

        errors.into_result()?;

        Ok(RoomInput {
            fields,
            images: parts.map(|_| accepted),
        })
    }
}

//! Persistence access for tours and users
//!
//! Every write path runs the entity's validation against the full candidate
//! state before a write transaction touches the database. Tour reads go
//! through an explicit visibility predicate and report their timing to the
//! injected [`QueryObserver`].

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use redb::{Database, ReadableDatabase, ReadableTable};

use crate::database::{
    generate_id, TABLE_TOURS, TABLE_TOUR_NAMES, TABLE_USERS, TABLE_USER_EMAILS,
};
use crate::error::{AppError, AppResult};
use crate::model::{Tour, TourDraft, TourInput, User, UserDraft, UserInput};
use crate::observer::QueryObserver;
use crate::password::{hash_password, verify_password};
use crate::query::{sort_tours, Pipeline, Stage, TourFilter, TourQuery, Visibility};
use crate::validation::{field_error, messages, validate_tour, validate_user, WriteMode};

fn tour_not_found() -> AppError {
    AppError::NotFound("No tour found with that ID".to_string())
}

fn user_not_found() -> AppError {
    AppError::NotFound("No user found with that ID".to_string())
}

fn tour_name_taken() -> AppError {
    field_error("name", "unique", messages::TOUR_NAME_TAKEN).into()
}

fn email_taken() -> AppError {
    field_error("email", "unique", messages::EMAIL_TAKEN).into()
}

/// Tour documents
#[derive(Clone)]
pub struct TourRepository {
    db: Arc<Database>,
    observer: Arc<dyn QueryObserver>,
}

impl TourRepository {
    pub fn new(db: Arc<Database>, observer: Arc<dyn QueryObserver>) -> Self {
        Self { db, observer }
    }

    /// Validates and stores a new tour
    ///
    /// Defaults are applied and text fields trimmed, then the full candidate
    /// is validated. The slug is derived only after validation passes.
    pub fn create(&self, input: TourInput) -> AppResult<Tour> {
        let draft = TourDraft::new(input, Utc::now());
        validate_tour(&draft)?;
        let tour = draft.into_tour(generate_id());

        let write_txn = self.db.begin_write()?;
        {
            let mut names = write_txn.open_table(TABLE_TOUR_NAMES)?;
            if names.get(tour.name.as_str())?.is_some() {
                return Err(tour_name_taken());
            }
            names.insert(tour.name.as_str(), tour.id.as_str())?;

            let mut tours = write_txn.open_table(TABLE_TOURS)?;
            tours.insert(tour.id.as_str(), serde_json::to_string(&tour)?.as_str())?;
        }
        write_txn.commit()?;

        tracing::info!(id = %tour.id, slug = %tour.slug, "tour created");
        Ok(tour)
    }

    /// Merges `input` over the stored tour, re-validates and re-slugs it
    ///
    /// Lookup goes through `visibility` like any other find-style query, so a
    /// secret tour cannot be updated without the explicit override.
    pub fn update(&self, id: &str, input: TourInput, visibility: Visibility) -> AppResult<Tour> {
        let started = Instant::now();

        let write_txn = self.db.begin_write()?;
        let tour = {
            let mut tours = write_txn.open_table(TABLE_TOURS)?;
            let existing = tours
                .get(id)?
                .map(|value| serde_json::from_str::<Tour>(value.value()))
                .transpose()?
                .filter(|tour| visibility.admits(tour))
                .ok_or_else(tour_not_found)?;

            let draft = TourDraft::merge(&existing, input);
            validate_tour(&draft)?;
            let tour = draft.into_tour(existing.id.clone());

            if tour.name != existing.name {
                let mut names = write_txn.open_table(TABLE_TOUR_NAMES)?;
                if names.get(tour.name.as_str())?.is_some() {
                    return Err(tour_name_taken());
                }
                names.remove(existing.name.as_str())?;
                names.insert(tour.name.as_str(), tour.id.as_str())?;
            }

            tours.insert(id, serde_json::to_string(&tour)?.as_str())?;
            tour
        };
        write_txn.commit()?;

        self.observer
            .query_finished("findOneAndUpdate", started.elapsed(), 1);
        Ok(tour)
    }

    /// Removes a tour and releases its name
    pub fn delete(&self, id: &str, visibility: Visibility) -> AppResult<()> {
        let started = Instant::now();

        let write_txn = self.db.begin_write()?;
        {
            let mut tours = write_txn.open_table(TABLE_TOURS)?;
            let existing = tours
                .get(id)?
                .map(|value| serde_json::from_str::<Tour>(value.value()))
                .transpose()?
                .filter(|tour| visibility.admits(tour))
                .ok_or_else(tour_not_found)?;
            tours.remove(id)?;

            let mut names = write_txn.open_table(TABLE_TOUR_NAMES)?;
            names.remove(existing.name.as_str())?;
        }
        write_txn.commit()?;

        self.observer
            .query_finished("findOneAndDelete", started.elapsed(), 1);
        tracing::info!(id, "tour deleted");
        Ok(())
    }

    pub fn find_by_id(&self, id: &str, visibility: Visibility) -> AppResult<Tour> {
        let started = Instant::now();

        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLE_TOURS)?;
        let found = table
            .get(id)?
            .map(|value| serde_json::from_str::<Tour>(value.value()))
            .transpose()?
            .filter(|tour| visibility.admits(tour));

        self.observer
            .query_finished("findOne", started.elapsed(), usize::from(found.is_some()));
        found.ok_or_else(tour_not_found)
    }

    pub fn find_by_slug(&self, slug: &str, visibility: Visibility) -> AppResult<Tour> {
        let started = Instant::now();

        let found = self
            .scan()?
            .into_iter()
            .find(|tour| tour.slug == slug && visibility.admits(tour));

        self.observer
            .query_finished("findOne", started.elapsed(), usize::from(found.is_some()));
        found.ok_or_else(|| AppError::NotFound(format!("No tour found with slug '{slug}'")))
    }

    /// Filters, sorts and pages the tour collection
    pub fn find(&self, query: &TourQuery, visibility: Visibility) -> AppResult<Vec<Tour>> {
        let started = Instant::now();

        let filter = query.filter.clone().with_visibility(visibility);
        let mut tours: Vec<Tour> = self
            .scan()?
            .into_iter()
            .filter(|tour| filter.matches(tour))
            .collect();
        sort_tours(&mut tours, &query.sort);
        let tours: Vec<Tour> = tours
            .into_iter()
            .skip(query.offset())
            .take(query.limit)
            .collect();

        self.observer
            .query_finished("find", started.elapsed(), tours.len());
        Ok(tours)
    }

    /// Runs `pipeline` over the tour collection
    ///
    /// With [`Visibility::Public`] a match stage excluding secret tours is
    /// placed in front of every other stage.
    pub fn aggregate(&self, pipeline: Pipeline, visibility: Visibility) -> AppResult<Vec<Tour>> {
        let started = Instant::now();

        let pipeline = match visibility {
            Visibility::Public => pipeline.unshift(Stage::Match(TourFilter::public())),
            Visibility::IncludeSecret => pipeline,
        };
        tracing::debug!(stages = ?pipeline.stages(), "running aggregation");
        let tours = pipeline.run(self.scan()?);

        self.observer
            .query_finished("aggregate", started.elapsed(), tours.len());
        Ok(tours)
    }

    fn scan(&self) -> AppResult<Vec<Tour>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLE_TOURS)?;

        let mut tours = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            tours.push(serde_json::from_str::<Tour>(value.value())?);
        }
        Ok(tours)
    }
}

/// User documents
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<Database>,
    bcrypt_cost: u32,
}

impl UserRepository {
    pub fn new(db: Arc<Database>, bcrypt_cost: u32) -> Self {
        Self { db, bcrypt_cost }
    }

    /// Validates, hashes the password of, and stores a new user
    ///
    /// The confirmation is checked against the plaintext and then dropped;
    /// only the bcrypt hash reaches the database.
    pub async fn create(&self, input: UserInput) -> AppResult<User> {
        let draft = UserDraft::new(input);
        validate_user(&draft, WriteMode::Create)?;
        self.ensure_email_available(&draft.email, None)?;

        let plaintext = draft
            .password
            .as_deref()
            .ok_or_else(|| field_error("password", "required", messages::PASSWORD_REQUIRED))?;
        let password = hash_password(plaintext, self.bcrypt_cost).await?;

        let user = User {
            id: generate_id(),
            name: draft.name,
            email: draft.email,
            photo: draft.photo,
            password,
            created_at: Utc::now(),
            password_changed_at: None,
        };

        let write_txn = self.db.begin_write()?;
        {
            let mut emails = write_txn.open_table(TABLE_USER_EMAILS)?;
            if emails.get(user.email.as_str())?.is_some() {
                return Err(email_taken());
            }
            emails.insert(user.email.as_str(), user.id.as_str())?;

            let mut users = write_txn.open_table(TABLE_USERS)?;
            users.insert(user.id.as_str(), serde_json::to_string(&user)?.as_str())?;
        }
        write_txn.commit()?;

        tracing::info!(id = %user.id, "user created");
        Ok(user)
    }

    /// Merges `input` over the stored user
    ///
    /// The stored hash is only replaced when `input` carries a new password,
    /// which must then pass the length and confirmation rules.
    pub async fn update(&self, id: &str, input: UserInput) -> AppResult<User> {
        let existing = self.find_by_id(id)?;
        let draft = UserDraft::merge(&existing, input);
        validate_user(&draft, WriteMode::Update)?;

        let email_changed = draft.email != existing.email;
        if email_changed {
            self.ensure_email_available(&draft.email, Some(id))?;
        }

        let (password, password_changed_at) = match draft.password.as_deref() {
            Some(plaintext) => (
                hash_password(plaintext, self.bcrypt_cost).await?,
                Some(Utc::now()),
            ),
            None => (existing.password.clone(), existing.password_changed_at),
        };

        let user = User {
            id: existing.id.clone(),
            name: draft.name,
            email: draft.email,
            photo: draft.photo,
            password,
            created_at: existing.created_at,
            password_changed_at,
        };

        let write_txn = self.db.begin_write()?;
        {
            let mut users = write_txn.open_table(TABLE_USERS)?;
            if users.get(id)?.is_none() {
                return Err(user_not_found());
            }

            if email_changed {
                let mut emails = write_txn.open_table(TABLE_USER_EMAILS)?;
                if let Some(owner) = emails.get(user.email.as_str())? {
                    if owner.value() != id {
                        return Err(email_taken());
                    }
                }
                emails.remove(existing.email.as_str())?;
                emails.insert(user.email.as_str(), id)?;
            }

            users.insert(id, serde_json::to_string(&user)?.as_str())?;
        }
        write_txn.commit()?;

        tracing::info!(
            id,
            password_changed = user.password_changed_at != existing.password_changed_at,
            "user updated"
        );
        Ok(user)
    }

    pub fn delete(&self, id: &str) -> AppResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut users = write_txn.open_table(TABLE_USERS)?;
            let existing = users
                .get(id)?
                .map(|value| serde_json::from_str::<User>(value.value()))
                .transpose()?
                .ok_or_else(user_not_found)?;
            users.remove(id)?;

            let mut emails = write_txn.open_table(TABLE_USER_EMAILS)?;
            emails.remove(existing.email.as_str())?;
        }
        write_txn.commit()?;

        tracing::info!(id, "user deleted");
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> AppResult<User> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLE_USERS)?;
        table
            .get(id)?
            .map(|value| serde_json::from_str::<User>(value.value()))
            .transpose()?
            .ok_or_else(user_not_found)
    }

    /// Looks a user up by email, normalized the same way it was stored
    pub fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = crate::model::normalize_email(email);

        let read_txn = self.db.begin_read()?;
        let emails = read_txn.open_table(TABLE_USER_EMAILS)?;
        let Some(id) = emails.get(email.as_str())?.map(|value| value.value().to_string()) else {
            return Ok(None);
        };

        let users = read_txn.open_table(TABLE_USERS)?;
        users
            .get(id.as_str())?
            .map(|value| serde_json::from_str::<User>(value.value()))
            .transpose()
            .map_err(AppError::from)
    }

    pub fn list(&self) -> AppResult<Vec<User>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLE_USERS)?;

        let mut users = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            users.push(serde_json::from_str::<User>(value.value())?);
        }
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }

    /// Returns the user when `password` matches the stored hash
    pub async fn verify_credentials(&self, email: &str, password: &str) -> AppResult<Option<User>> {
        let Some(user) = self.find_by_email(email)? else {
            return Ok(None);
        };
        if verify_password(password, &user.password).await? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    fn ensure_email_available(&self, email: &str, owner: Option<&str>) -> AppResult<()> {
        let read_txn = self.db.begin_read()?;
        let emails = read_txn.open_table(TABLE_USER_EMAILS)?;
        match emails.get(email)? {
            Some(holder) if Some(holder.value()) != owner => Err(email_taken()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{init_db, AppState};
    use crate::query::{SortField, SortKey};
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    #[derive(Debug, Default)]
    struct RecordingObserver {
        calls: Mutex<Vec<(&'static str, usize)>>,
    }

    impl QueryObserver for RecordingObserver {
        fn query_finished(&self, operation: &'static str, _elapsed: Duration, returned: usize) {
            self.calls.lock().unwrap().push((operation, returned));
        }
    }

    fn setup() -> (AppState, Arc<RecordingObserver>, NamedTempFile) {
        let temp_db = NamedTempFile::new().expect("Failed to create temp file");
        let db = init_db(temp_db.path().to_str().unwrap()).expect("Failed to initialize test database");
        let observer = Arc::new(RecordingObserver::default());
        let state = AppState::with_options(Arc::new(db), 4, observer.clone());
        (state, observer, temp_db)
    }

    fn tour_input(name: &str, price: f64, secret: bool) -> TourInput {
        TourInput {
            name: Some(name.to_string()),
            price: Some(price),
            secret_tour: Some(secret),
            duration: Some(5.0),
            difficulty: Some("easy".to_string()),
            ..TourInput::default()
        }
    }

    fn user_input(email: &str, password: &str, confirm: &str) -> UserInput {
        UserInput {
            name: Some("Jonas Schmedtmann".to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
            password_confirm: Some(confirm.to_string()),
            ..UserInput::default()
        }
    }

    fn field_of(err: AppError) -> Vec<String> {
        match err {
            AppError::Validation(errors) => errors
                .field_errors()
                .keys()
                .map(|field| field.to_string())
                .collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_create_tour_derives_slug() {
        let (state, _, _db) = setup();

        let tour = state.tours.create(tour_input("The Forest Hiker", 397.0, false)).unwrap();

        assert_eq!(tour.slug, "the-forest-hiker");
        assert_eq!(tour.ratings_average, 4.5);
        let stored = state.tours.find_by_id(&tour.id, Visibility::Public).unwrap();
        assert_eq!(stored, tour);
    }

    #[test]
    fn test_create_tour_rejects_duplicate_name() {
        let (state, _, _db) = setup();
        state.tours.create(tour_input("The Forest Hiker", 397.0, false)).unwrap();

        let err = state
            .tours
            .create(tour_input("  The Forest Hiker ", 100.0, false))
            .unwrap_err();
        assert_eq!(field_of(err), ["name"]);
    }

    #[test]
    fn test_invalid_tour_is_never_persisted() {
        let (state, _, _db) = setup();
        let mut input = tour_input("The Forest Hiker", 100.0, false);
        input.price_discount = Some(Some(100.0));

        let err = state.tours.create(input).unwrap_err();
        assert_eq!(field_of(err), ["priceDiscount"]);
        assert!(state.tours.find(&TourQuery::default(), Visibility::IncludeSecret).unwrap().is_empty());

        // Name is free again because nothing was written
        state.tours.create(tour_input("The Forest Hiker", 100.0, false)).unwrap();
    }

    #[test]
    fn test_update_revalidates_discount_against_stored_price() {
        let (state, _, _db) = setup();
        let tour = state.tours.create(tour_input("The Forest Hiker", 397.0, false)).unwrap();

        let patch = TourInput {
            price_discount: Some(Some(400.0)),
            ..TourInput::default()
        };
        let err = state.tours.update(&tour.id, patch, Visibility::Public).unwrap_err();
        assert_eq!(field_of(err), ["priceDiscount"]);

        let patch = TourInput {
            price_discount: Some(Some(97.0)),
            ..TourInput::default()
        };
        let updated = state.tours.update(&tour.id, patch, Visibility::Public).unwrap();
        assert_eq!(updated.price_discount, Some(97.0));

        // Cutting the price below the discount works once the discount is cleared
        let patch = TourInput {
            price: Some(50.0),
            price_discount: Some(None),
            ..TourInput::default()
        };
        let updated = state.tours.update(&tour.id, patch, Visibility::Public).unwrap();
        assert_eq!(updated.price, Some(50.0));
        assert_eq!(updated.price_discount, None);
    }

    #[test]
    fn test_update_renames_and_reslugs() {
        let (state, _, _db) = setup();
        let tour = state.tours.create(tour_input("The Forest Hiker", 397.0, false)).unwrap();

        let patch = TourInput {
            name: Some("The Mountain Hiker".to_string()),
            ..TourInput::default()
        };
        let updated = state.tours.update(&tour.id, patch, Visibility::Public).unwrap();
        assert_eq!(updated.slug, "the-mountain-hiker");
        assert_eq!(updated.created_at, tour.created_at);

        // Old name is released
        state.tours.create(tour_input("The Forest Hiker", 397.0, false)).unwrap();
    }

    #[test]
    fn test_secret_tours_are_hidden_from_reads() {
        let (state, observer, _db) = setup();
        state.tours.create(tour_input("The Forest Hiker", 397.0, false)).unwrap();
        let secret = state.tours.create(tour_input("The Secret Valley", 999.0, true)).unwrap();

        let public = state.tours.find(&TourQuery::default(), Visibility::Public).unwrap();
        assert_eq!(public.len(), 1);
        assert!(public.iter().all(|tour| !tour.secret_tour));

        let all = state.tours.find(&TourQuery::default(), Visibility::IncludeSecret).unwrap();
        assert_eq!(all.len(), 2);

        assert!(matches!(
            state.tours.find_by_id(&secret.id, Visibility::Public),
            Err(AppError::NotFound(_))
        ));
        assert!(state.tours.find_by_id(&secret.id, Visibility::IncludeSecret).is_ok());

        assert!(matches!(
            state.tours.update(&secret.id, TourInput::default(), Visibility::Public),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            state.tours.delete(&secret.id, Visibility::Public),
            Err(AppError::NotFound(_))
        ));

        let calls = observer.calls.lock().unwrap();
        assert_eq!(calls[0], ("find", 1));
        assert_eq!(calls[1], ("find", 2));
        assert_eq!(calls[2], ("findOne", 0));
        assert_eq!(calls[3], ("findOne", 1));
    }

    #[test]
    fn test_aggregate_prepends_secret_match() {
        let (state, observer, _db) = setup();
        state.tours.create(tour_input("The Forest Hiker", 397.0, false)).unwrap();
        state.tours.create(tour_input("The Secret Valley", 10.0, true)).unwrap();

        let cheapest = Pipeline::new()
            .sort(vec![SortKey::asc(SortField::Price)])
            .limit(1);

        let public = state.tours.aggregate(cheapest.clone(), Visibility::Public).unwrap();
        assert_eq!(public[0].name, "The Forest Hiker");

        let all = state.tours.aggregate(cheapest, Visibility::IncludeSecret).unwrap();
        assert_eq!(all[0].name, "The Secret Valley");

        assert_eq!(observer.calls.lock().unwrap()[0], ("aggregate", 1));
    }

    #[test]
    fn test_find_by_slug() {
        let (state, _, _db) = setup();
        let tour = state.tours.create(tour_input("The Forest Hiker", 397.0, false)).unwrap();

        assert_eq!(state.tours.find_by_slug("the-forest-hiker", Visibility::Public).unwrap().id, tour.id);
        assert!(state.tours.find_by_slug("missing-tour", Visibility::Public).is_err());
    }

    #[test]
    fn test_delete_releases_name() {
        let (state, _, _db) = setup();
        let tour = state.tours.create(tour_input("The Forest Hiker", 397.0, false)).unwrap();

        state.tours.delete(&tour.id, Visibility::Public).unwrap();
        assert!(state.tours.find_by_id(&tour.id, Visibility::Public).is_err());
        state.tours.create(tour_input("The Forest Hiker", 397.0, false)).unwrap();
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let (state, _, _db) = setup();

        let user = state
            .users
            .create(user_input("Jonas@Example.com", "abcd1234", "abcd1234"))
            .await
            .unwrap();

        assert_eq!(user.email, "jonas@example.com");
        assert_ne!(user.password, "abcd1234");
        assert!(bcrypt::verify("abcd1234", &user.password).unwrap());

        let other = state
            .users
            .create(user_input("other@example.com", "abcd1234", "abcd1234"))
            .await
            .unwrap();
        assert_ne!(user.password, other.password);
    }

    #[tokio::test]
    async fn test_create_user_rejects_mismatch_and_duplicates() {
        let (state, _, _db) = setup();

        let err = state
            .users
            .create(user_input("jonas@example.com", "abcd1234", "abcd9999"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Passwords must match."));

        state
            .users
            .create(user_input("jonas@example.com", "abcd1234", "abcd1234"))
            .await
            .unwrap();
        let err = state
            .users
            .create(user_input(" JONAS@example.com", "abcd1234", "abcd1234"))
            .await
            .unwrap_err();
        assert_eq!(field_of(err), ["email"]);
    }

    #[tokio::test]
    async fn test_update_without_password_keeps_hash() {
        let (state, _, _db) = setup();
        let user = state
            .users
            .create(user_input("jonas@example.com", "abcd1234", "abcd1234"))
            .await
            .unwrap();

        let updated = state
            .users
            .update(
                &user.id,
                UserInput {
                    name: Some("Jonas S.".to_string()),
                    ..UserInput::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Jonas S.");
        assert_eq!(updated.password, user.password);
        assert!(updated.password_changed_at.is_none());
    }

    #[tokio::test]
    async fn test_update_with_password_rehashes() {
        let (state, _, _db) = setup();
        let user = state
            .users
            .create(user_input("jonas@example.com", "abcd1234", "abcd1234"))
            .await
            .unwrap();

        let err = state
            .users
            .update(
                &user.id,
                UserInput {
                    password: Some("newpass99".to_string()),
                    password_confirm: Some("newpass00".to_string()),
                    ..UserInput::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(field_of(err), ["passwordConfirm"]);

        let updated = state
            .users
            .update(
                &user.id,
                UserInput {
                    password: Some("newpass99".to_string()),
                    password_confirm: Some("newpass99".to_string()),
                    ..UserInput::default()
                },
            )
            .await
            .unwrap();
        assert_ne!(updated.password, user.password);
        assert!(updated.password_changed_at.is_some());
        assert!(state.users.verify_credentials("jonas@example.com", "newpass99").await.unwrap().is_some());
        assert!(state.users.verify_credentials("jonas@example.com", "abcd1234").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_email_moves_index() {
        let (state, _, _db) = setup();
        let user = state
            .users
            .create(user_input("jonas@example.com", "abcd1234", "abcd1234"))
            .await
            .unwrap();
        state
            .users
            .create(user_input("taken@example.com", "abcd1234", "abcd1234"))
            .await
            .unwrap();

        let err = state
            .users
            .update(
                &user.id,
                UserInput {
                    email: Some("taken@example.com".to_string()),
                    ..UserInput::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(field_of(err), ["email"]);

        state
            .users
            .update(
                &user.id,
                UserInput {
                    email: Some("new@example.com".to_string()),
                    ..UserInput::default()
                },
            )
            .await
            .unwrap();
        assert!(state.users.find_by_email("jonas@example.com").unwrap().is_none());
        assert_eq!(state.users.find_by_email("NEW@example.com").unwrap().unwrap().id, user.id);
    }

    #[tokio::test]
    async fn test_delete_user() {
        let (state, _, _db) = setup();
        let user = state
            .users
            .create(user_input("jonas@example.com", "abcd1234", "abcd1234"))
            .await
            .unwrap();

        state.users.delete(&user.id).unwrap();
        assert!(matches!(state.users.find_by_id(&user.id), Err(AppError::NotFound(_))));
        assert!(state.users.list().unwrap().is_empty());
    }
}

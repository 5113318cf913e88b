use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::parcel::Parcel;
use crate::models::user::{User, UserStatus};

#[derive(Default)]
pub struct ParcelStore {
    inner: DashMap<Uuid, Parcel>,
}

impl ParcelStore {
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    pub fn insert(&self, parcel: Parcel) {
        self.inner.insert(parcel.id, parcel);
    }

    pub fn get(&self, id: Uuid) -> Option<Parcel> {
        self.inner.get(&id).map(|entry| entry.value().clone())
    }

    pub fn find_by_tracking_id(&self, tracking_id: &str) -> Option<Parcel> {
        self.inner
            .iter()
            .find(|entry| entry.value().tracking_id == tracking_id)
            .map(|entry| entry.value().clone())
    }

    // Checks and writes run under the entry lock; the version counter
    // bumps only when `apply` succeeds.
    pub fn update(
        &self,
        id: Uuid,
        apply: impl FnOnce(&mut Parcel) -> Result<(), AppError>,
    ) -> Result<Parcel, AppError> {
        let mut entry = self
            .inner
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("parcel {id} not found")))?;

        let parcel = entry.value_mut();
        apply(parcel)?;
        parcel.version += 1;
        parcel.updated_at = Utc::now();

        Ok(parcel.clone())
    }

    pub fn remove_where(
        &self,
        id: Uuid,
        check: impl FnOnce(&Parcel) -> Result<(), AppError>,
    ) -> Result<Parcel, AppError> {
        let mut rejection = None;
        let removed = self.inner.remove_if(&id, |_, parcel| match check(parcel) {
            Ok(()) => true,
            Err(err) => {
                rejection = Some(err);
                false
            }
        });

        match removed {
            Some((_, parcel)) => Ok(parcel),
            None => Err(rejection
                .unwrap_or_else(|| AppError::NotFound(format!("parcel {id} not found")))),
        }
    }

    pub fn collect(&self, mut pred: impl FnMut(&Parcel) -> bool) -> Vec<Parcel> {
        self.inner
            .iter()
            .filter(|entry| pred(entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn for_each(&self, mut f: impl FnMut(&Parcel)) {
        for entry in self.inner.iter() {
            f(entry.value());
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

#[derive(Default)]
pub struct UserDirectory {
    inner: DashMap<Uuid, User>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    pub fn insert(&self, user: User) {
        self.inner.insert(user.id, user);
    }

    pub fn get(&self, id: Uuid) -> Option<User> {
        self.inner.get(&id).map(|entry| entry.value().clone())
    }

    pub fn find_by_email(&self, email: &str) -> Option<User> {
        self.inner
            .iter()
            .find(|entry| entry.value().email == email)
            .map(|entry| entry.value().clone())
    }

    pub fn set_status(&self, id: Uuid, status: UserStatus) -> Result<User, AppError> {
        let mut entry = self
            .inner
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("user {id} not found")))?;

        entry.value_mut().status = status;
        Ok(entry.value().clone())
    }

    pub fn for_each(&self, mut f: impl FnMut(&User)) {
        for entry in self.inner.iter() {
            f(entry.value());
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

//! The roster and calculation history store.
//!
//! [`AppStore`] owns the staff roster and the saved tip calculations. Every
//! command validates its input, produces a new immutable [`AppSnapshot`], and
//! hands the snapshot to the storage backend. Storage failures are logged and
//! never undo the in-memory change.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::PoolPolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{Staff, StaffRole, TipCalculation};

use super::persistence::{StorageBackend, StoredState};

/// An immutable view of the store's state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppSnapshot {
    /// The staff roster in insertion order.
    pub staff: Vec<Staff>,
    /// Saved tip calculations in insertion order.
    pub tip_calculations: Vec<TipCalculation>,
}

/// Aggregate figures over the calculation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistorySummary {
    /// Number of saved calculations.
    pub calculation_count: usize,
    /// Sum of all collected tips.
    pub total_tips: Decimal,
    /// Sum of all payouts.
    pub total_paid: Decimal,
    /// Sum of all undistributed leftovers.
    pub total_undistributed: Decimal,
}

/// Owns the roster and calculation history.
///
/// # Example
///
/// ```
/// use tip_pool_engine::config::PoolPolicy;
/// use tip_pool_engine::models::{Staff, StaffRole};
/// use tip_pool_engine::store::AppStore;
/// use rust_decimal::Decimal;
///
/// let mut store = AppStore::new(PoolPolicy::default());
/// let snapshot = store
///     .add_staff(Staff {
///         id: String::new(),
///         name: "Ana".to_string(),
///         role: StaffRole::new("waiter", "Waiter", "#2196F3"),
///         lunch_shift: Decimal::from(6),
///         dinner_shift: Decimal::from(6),
///         is_active: true,
///     })
///     .unwrap();
/// assert_eq!(snapshot.staff.len(), 1);
/// assert!(!snapshot.staff[0].id.is_empty());
/// ```
pub struct AppStore {
    policy: PoolPolicy,
    snapshot: Arc<AppSnapshot>,
    storage: Option<Box<dyn StorageBackend>>,
}

impl AppStore {
    /// Creates an empty store that is not persisted.
    pub fn new(policy: PoolPolicy) -> Self {
        Self {
            policy,
            snapshot: Arc::new(AppSnapshot::default()),
            storage: None,
        }
    }

    /// Creates a store backed by `storage`, loading whatever it holds.
    ///
    /// A failed load is logged and the store starts empty with saving
    /// disabled, so the unreadable data is left untouched.
    pub fn with_storage(policy: PoolPolicy, storage: Box<dyn StorageBackend>) -> Self {
        let (snapshot, storage) = match storage.load() {
            Ok(Some(state)) => {
                info!(
                    location = %storage.location(),
                    staff = state.staff.len(),
                    calculations = state.tip_calculations.len(),
                    "Loaded stored state"
                );
                let snapshot = AppSnapshot {
                    staff: state.staff,
                    tip_calculations: state.tip_calculations,
                };
                (snapshot, Some(storage))
            }
            Ok(None) => (AppSnapshot::default(), Some(storage)),
            Err(err) => {
                warn!(
                    location = %storage.location(),
                    error = %err,
                    "Failed to load stored state, starting empty with saving disabled"
                );
                (AppSnapshot::default(), None)
            }
        };

        Self {
            policy,
            snapshot: Arc::new(snapshot),
            storage,
        }
    }

    /// Returns true if commands are written to a storage backend.
    pub fn is_persistent(&self) -> bool {
        self.storage.is_some()
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> Arc<AppSnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Returns the pool policy staff are validated against.
    pub fn policy(&self) -> &PoolPolicy {
        &self.policy
    }

    /// Returns the role catalog.
    pub fn roles(&self) -> Vec<StaffRole> {
        self.policy.roles().iter().map(|r| r.to_staff_role()).collect()
    }

    /// Returns the whole roster.
    pub fn staff(&self) -> &[Staff] {
        &self.snapshot.staff
    }

    /// Returns the staff members still employed.
    pub fn active_staff(&self) -> Vec<Staff> {
        self.snapshot
            .staff
            .iter()
            .filter(|s| s.is_active)
            .cloned()
            .collect()
    }

    /// Looks up a staff member by id.
    pub fn find_staff(&self, id: &str) -> EngineResult<&Staff> {
        self.snapshot
            .staff
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| EngineError::StaffNotFound { id: id.to_string() })
    }

    /// Resolves selected ids to staff, in selection order.
    ///
    /// Ids that are no longer on the roster are skipped.
    pub fn select_staff(&self, ids: &[String]) -> Vec<Staff> {
        ids.iter()
            .filter_map(|id| self.snapshot.staff.iter().find(|s| &s.id == id))
            .cloned()
            .collect()
    }

    /// Filters the roster by a case-insensitive name fragment and an optional
    /// role id.
    pub fn search_staff(&self, query: &str, role_id: Option<&str>) -> Vec<Staff> {
        let query = query.trim().to_lowercase();
        self.snapshot
            .staff
            .iter()
            .filter(|s| s.name.to_lowercase().contains(&query))
            .filter(|s| role_id.is_none_or(|r| s.role.id == r))
            .cloned()
            .collect()
    }

    /// Adds a staff member to the roster.
    ///
    /// An empty id is replaced with a generated one and the role tag is
    /// refreshed from the catalog.
    ///
    /// # Errors
    ///
    /// - `InvalidStaff` for an empty name, unknown role or out-of-range shift
    /// - `DuplicateStaffName` if the name is already taken
    pub fn add_staff(&mut self, staff: Staff) -> EngineResult<Arc<AppSnapshot>> {
        let mut staff = self.validate_staff(staff)?;
        if staff.id.trim().is_empty() {
            staff.id = Uuid::new_v4().to_string();
        }
        if self.snapshot.staff.iter().any(|s| s.id == staff.id) {
            return Err(EngineError::InvalidStaff {
                field: "id".to_string(),
                message: format!("id '{}' is already in use", staff.id),
            });
        }
        self.ensure_unique_name(&staff.name, None)?;

        info!(staff_id = %staff.id, role = %staff.role.id, "Adding staff");
        let mut next = (*self.snapshot).clone();
        next.staff.push(staff);
        Ok(self.commit(next))
    }

    /// Replaces the staff member with the same id.
    ///
    /// # Errors
    ///
    /// - `StaffNotFound` if no staff member has this id
    /// - the validation errors of [`AppStore::add_staff`]
    pub fn update_staff(&mut self, staff: Staff) -> EngineResult<Arc<AppSnapshot>> {
        let staff = self.validate_staff(staff)?;
        let index = self.staff_index(&staff.id)?;
        self.ensure_unique_name(&staff.name, Some(&staff.id))?;

        info!(staff_id = %staff.id, "Updating staff");
        let mut next = (*self.snapshot).clone();
        next.staff[index] = staff;
        Ok(self.commit(next))
    }

    /// Removes a staff member from the roster.
    ///
    /// Saved calculations keep their copy of the staff member's name and role.
    pub fn remove_staff(&mut self, id: &str) -> EngineResult<Arc<AppSnapshot>> {
        let index = self.staff_index(id)?;

        info!(staff_id = %id, "Removing staff");
        let mut next = (*self.snapshot).clone();
        next.staff.remove(index);
        Ok(self.commit(next))
    }

    /// Returns saved calculations, newest first.
    pub fn tip_calculations(&self) -> Vec<TipCalculation> {
        let mut calculations = self.snapshot.tip_calculations.clone();
        calculations.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
        calculations
    }

    /// Looks up a saved calculation by id.
    pub fn find_tip_calculation(&self, id: &str) -> EngineResult<&TipCalculation> {
        self.snapshot
            .tip_calculations
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| EngineError::CalculationNotFound { id: id.to_string() })
    }

    /// Saves a calculation to the history.
    ///
    /// # Errors
    ///
    /// - `NoStaffSelected` if the calculation pays nobody
    /// - `DuplicateCalculationId` if the id is already in the history
    pub fn add_tip_calculation(
        &mut self,
        calculation: TipCalculation,
    ) -> EngineResult<Arc<AppSnapshot>> {
        if calculation.staff_members.is_empty() {
            return Err(EngineError::NoStaffSelected);
        }
        if self
            .snapshot
            .tip_calculations
            .iter()
            .any(|c| c.id == calculation.id)
        {
            return Err(EngineError::DuplicateCalculationId {
                id: calculation.id,
            });
        }

        info!(
            calculation_id = %calculation.id,
            total = %calculation.total_tip_amount,
            staff_count = calculation.staff_members.len(),
            "Saving tip calculation"
        );
        let mut next = (*self.snapshot).clone();
        next.tip_calculations.push(calculation);
        Ok(self.commit(next))
    }

    /// Replaces the saved calculation with the same id.
    pub fn update_tip_calculation(
        &mut self,
        calculation: TipCalculation,
    ) -> EngineResult<Arc<AppSnapshot>> {
        let index = self.calculation_index(&calculation.id)?;
        if calculation.staff_members.is_empty() {
            return Err(EngineError::NoStaffSelected);
        }

        info!(calculation_id = %calculation.id, "Updating tip calculation");
        let mut next = (*self.snapshot).clone();
        next.tip_calculations[index] = calculation;
        Ok(self.commit(next))
    }

    /// Deletes a saved calculation.
    pub fn remove_tip_calculation(&mut self, id: &str) -> EngineResult<Arc<AppSnapshot>> {
        let index = self.calculation_index(id)?;

        info!(calculation_id = %id, "Removing tip calculation");
        let mut next = (*self.snapshot).clone();
        next.tip_calculations.remove(index);
        Ok(self.commit(next))
    }

    /// Sums the calculation history.
    pub fn history_summary(&self) -> HistorySummary {
        let calculations = &self.snapshot.tip_calculations;
        HistorySummary {
            calculation_count: calculations.len(),
            total_tips: saturating_sum(calculations.iter().map(|c| c.total_tip_amount)),
            total_paid: saturating_sum(calculations.iter().map(|c| c.total_paid())),
            total_undistributed: saturating_sum(calculations.iter().map(|c| c.undistributed_amount)),
        }
    }

    fn validate_staff(&self, mut staff: Staff) -> EngineResult<Staff> {
        staff.name = staff.name.trim().to_string();
        if staff.name.is_empty() {
            return Err(EngineError::InvalidStaff {
                field: "name".to_string(),
                message: "name is required".to_string(),
            });
        }

        let role = self
            .policy
            .role(&staff.role.id)
            .ok_or_else(|| EngineError::InvalidStaff {
                field: "role".to_string(),
                message: format!("unknown role '{}'", staff.role.id),
            })?;
        staff.role = role.to_staff_role();

        let full_shift_unit = self.policy.full_shift_unit();
        for (field, value) in [
            ("lunch_shift", staff.lunch_shift),
            ("dinner_shift", staff.dinner_shift),
        ] {
            if value < Decimal::ZERO || value > full_shift_unit {
                return Err(EngineError::InvalidStaff {
                    field: field.to_string(),
                    message: format!(
                        "must be between 0 and {} hours, got {}",
                        full_shift_unit.normalize(),
                        value.normalize()
                    ),
                });
            }
        }
        Ok(staff)
    }

    fn ensure_unique_name(&self, name: &str, except_id: Option<&str>) -> EngineResult<()> {
        let taken = self
            .snapshot
            .staff
            .iter()
            .any(|s| s.has_name(name) && Some(s.id.as_str()) != except_id);
        if taken {
            return Err(EngineError::DuplicateStaffName {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn staff_index(&self, id: &str) -> EngineResult<usize> {
        self.snapshot
            .staff
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| EngineError::StaffNotFound { id: id.to_string() })
    }

    fn calculation_index(&self, id: &str) -> EngineResult<usize> {
        self.snapshot
            .tip_calculations
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| EngineError::CalculationNotFound { id: id.to_string() })
    }

    fn commit(&mut self, next: AppSnapshot) -> Arc<AppSnapshot> {
        self.snapshot = Arc::new(next);
        self.persist();
        Arc::clone(&self.snapshot)
    }

    fn persist(&self) {
        let Some(storage) = &self.storage else {
            return;
        };
        let state = StoredState::new(
            self.snapshot.staff.clone(),
            self.snapshot.tip_calculations.clone(),
        );
        if let Err(err) = storage.save(&state) {
            warn!(
                location = %storage.location(),
                error = %err,
                "Failed to persist state, keeping in-memory changes"
            );
        }
    }
}

fn saturating_sum(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, |acc, amount| acc.saturating_add(amount))
}

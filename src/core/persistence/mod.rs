//! Plan persistence: the wire payload, the store contract, a JSON-file
//! reference store, and the optimistic in-memory plan list
//!
//! All engine operations are synchronous over the in-memory plan; the store
//! is the only asynchronous boundary in the surrounding application. The
//! shelf applies every mutation optimistically, keeps the prior snapshot,
//! and rolls the whole snapshot back when the store call fails - the plan
//! list is single-writer with last-write-wins semantics per plan id.

use crate::core::models::{ExchangePlan, Subject, Term};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

/// Flattened projection of a plan as sent to and from the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanPayload {
    /// Owning student
    pub owner_id: String,
    /// Optional human-readable plan name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,
    /// Home institution
    pub university: String,
    /// "Country - Institution" composite
    pub exchange_university: String,
    /// Study program
    pub program: String,
    /// Technical track, when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technology_direction: Option<String>,
    /// Specialization, when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    /// Study year (1-5)
    pub study_year: u8,
    /// Exchange term
    pub semester: Term,
    /// Subjects with their elective selections and matches
    #[serde(default)]
    pub subjects: Vec<Subject>,
}

impl PlanPayload {
    /// Flatten a plan into its wire projection
    #[must_use]
    pub fn from_plan(plan: &ExchangePlan, owner_id: &str) -> Self {
        Self {
            owner_id: owner_id.to_string(),
            plan_name: plan.plan_name.clone(),
            university: plan.university.clone(),
            exchange_university: plan.exchange_university.clone(),
            program: plan.program.clone(),
            technology_direction: plan.technology_direction.clone(),
            specialization: plan.specialization.clone(),
            study_year: plan.study_year,
            semester: plan.semester,
            subjects: plan.subjects.clone(),
        }
    }

    /// Rebuild the in-memory plan under a store-assigned id.
    ///
    /// Reconstruction against the current curriculum template is the
    /// reconciliation component's job, not the payload's.
    #[must_use]
    pub fn into_plan(self, id: String) -> ExchangePlan {
        ExchangePlan {
            id,
            plan_name: self.plan_name,
            university: self.university,
            exchange_university: self.exchange_university,
            program: self.program,
            technology_direction: self.technology_direction,
            specialization: self.specialization,
            study_year: self.study_year,
            semester: self.semester,
            subjects: self.subjects,
        }
    }
}

/// Persistence collaborator contract
pub trait PlanStore {
    /// Persist a new plan, returning its durable id
    ///
    /// # Errors
    /// Returns an error when the store cannot record the plan
    fn create_plan(&mut self, payload: &PlanPayload) -> Result<String, Box<dyn Error>>;

    /// Replace the stored payload for an existing plan
    ///
    /// # Errors
    /// Returns an error when the plan is unknown or the write fails
    fn update_plan(&mut self, id: &str, payload: &PlanPayload) -> Result<(), Box<dyn Error>>;

    /// Remove a stored plan
    ///
    /// # Errors
    /// Returns an error when the plan is unknown or the delete fails
    fn delete_plan(&mut self, id: &str) -> Result<(), Box<dyn Error>>;

    /// List the stored plans belonging to an owner
    ///
    /// # Errors
    /// Returns an error when the store cannot be read
    fn list_plans(&self, owner_id: &str) -> Result<Vec<ExchangePlan>, Box<dyn Error>>;
}

/// One stored plan document
#[derive(Debug, Serialize, Deserialize)]
struct StoredPlan {
    id: String,
    payload: PlanPayload,
}

/// Read a single stored plan document from disk.
///
/// # Errors
/// Returns an error when the file cannot be read or parsed
pub fn read_plan_file(path: &std::path::Path) -> Result<ExchangePlan, Box<dyn Error>> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read plan file '{}': {e}", path.display()))?;
    let stored: StoredPlan = serde_json::from_str(&content)
        .map_err(|e| format!("Failed to parse plan file '{}': {e}", path.display()))?;
    Ok(stored.payload.into_plan(stored.id))
}

/// Directory-backed store: one JSON document per plan under `plans_dir`
#[derive(Debug, Clone)]
pub struct JsonPlanStore {
    dir: PathBuf,
}

impl JsonPlanStore {
    /// Open a store over a directory, creating it if needed
    ///
    /// # Errors
    /// Returns an error when the directory cannot be created
    pub fn open<P: Into<PathBuf>>(dir: P) -> Result<Self, Box<dyn Error>> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn plan_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    fn write_plan(&self, id: &str, payload: &PlanPayload) -> Result<(), Box<dyn Error>> {
        let stored = StoredPlan {
            id: id.to_string(),
            payload: payload.clone(),
        };
        let json = serde_json::to_string_pretty(&stored)?;
        fs::write(self.plan_path(id), json)?;
        Ok(())
    }
}

impl PlanStore for JsonPlanStore {
    fn create_plan(&mut self, payload: &PlanPayload) -> Result<String, Box<dyn Error>> {
        let id = format!("plan-{}", Uuid::new_v4());
        self.write_plan(&id, payload)?;
        Ok(id)
    }

    fn update_plan(&mut self, id: &str, payload: &PlanPayload) -> Result<(), Box<dyn Error>> {
        if !self.plan_path(id).exists() {
            return Err(format!("Unknown plan id: '{id}'").into());
        }
        self.write_plan(id, payload)
    }

    fn delete_plan(&mut self, id: &str) -> Result<(), Box<dyn Error>> {
        let path = self.plan_path(id);
        if !path.exists() {
            return Err(format!("Unknown plan id: '{id}'").into());
        }
        fs::remove_file(path)?;
        Ok(())
    }

    fn list_plans(&self, owner_id: &str) -> Result<Vec<ExchangePlan>, Box<dyn Error>> {
        let mut plans = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let content = fs::read_to_string(&path)?;
            let stored: StoredPlan = serde_json::from_str(&content)?;
            if stored.payload.owner_id == owner_id {
                plans.push(stored.payload.into_plan(stored.id));
            }
        }

        // Directory order is not stable; keep the list deterministic
        plans.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(plans)
    }
}

/// The in-memory plan list for one student session, with optimistic
/// store synchronization
#[derive(Debug, Clone)]
pub struct PlanShelf {
    owner_id: String,
    plans: Vec<ExchangePlan>,
}

impl PlanShelf {
    /// Create an empty shelf for an owner
    #[must_use]
    pub const fn new(owner_id: String) -> Self {
        Self {
            owner_id,
            plans: Vec::new(),
        }
    }

    /// Load the owner's plans from the store
    ///
    /// # Errors
    /// Returns an error when the store cannot be read
    pub fn load(owner_id: String, store: &dyn PlanStore) -> Result<Self, Box<dyn Error>> {
        let plans = store.list_plans(&owner_id)?;
        Ok(Self { owner_id, plans })
    }

    /// The current in-memory plans
    #[must_use]
    pub fn plans(&self) -> &[ExchangePlan] {
        &self.plans
    }

    /// Look up a plan by id - temporary ids resolve against the same
    /// in-memory object until the durable id swap happens
    #[must_use]
    pub fn plan(&self, id: &str) -> Option<&ExchangePlan> {
        self.plans.iter().find(|p| p.id == id)
    }

    /// Look up a plan by id, mutably
    pub fn plan_mut(&mut self, id: &str) -> Option<&mut ExchangePlan> {
        self.plans.iter_mut().find(|p| p.id == id)
    }

    /// Save a plan: the shelf is updated immediately, then the store call
    /// is issued; on failure the entire prior snapshot is restored.
    ///
    /// A plan with a temporary id goes through `create_plan` and has its id
    /// swapped for the durable one on success; otherwise `update_plan`.
    ///
    /// # Returns
    /// The plan's (possibly new) durable id
    ///
    /// # Errors
    /// Returns the store error after rolling the shelf back
    pub fn save_plan(
        &mut self,
        store: &mut dyn PlanStore,
        plan: ExchangePlan,
    ) -> Result<String, Box<dyn Error>> {
        let snapshot = self.plans.clone();
        let was_temp = plan.has_temp_id();
        let in_memory_id = plan.id.clone();
        let payload = PlanPayload::from_plan(&plan, &self.owner_id);

        // Optimistic: the shelf reflects the save before the store answers
        if let Some(existing) = self.plan_mut(&in_memory_id) {
            *existing = plan;
        } else {
            self.plans.push(plan);
        }

        let result = if was_temp {
            store.create_plan(&payload)
        } else {
            store
                .update_plan(&in_memory_id, &payload)
                .map(|()| in_memory_id.clone())
        };

        match result {
            Ok(durable_id) => {
                if was_temp {
                    if let Some(saved) = self.plan_mut(&in_memory_id) {
                        saved.assign_durable_id(durable_id.clone());
                    }
                }
                Ok(durable_id)
            }
            Err(err) => {
                self.plans = snapshot;
                Err(err)
            }
        }
    }

    /// Delete a plan optimistically; rolled back if the store refuses.
    /// A plan that was never persisted is removed without a store call.
    ///
    /// # Errors
    /// Returns the store error after rolling the shelf back
    pub fn delete_plan(
        &mut self,
        store: &mut dyn PlanStore,
        id: &str,
    ) -> Result<(), Box<dyn Error>> {
        let snapshot = self.plans.clone();
        let Some(pos) = self.plans.iter().position(|p| p.id == id) else {
            return Err(format!("Unknown plan id: '{id}'").into());
        };
        let was_temp = self.plans[pos].has_temp_id();
        self.plans.remove(pos);

        if was_temp {
            return Ok(());
        }

        if let Err(err) = store.delete_plan(id) {
            self.plans = snapshot;
            return Err(err);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> ExchangePlan {
        ExchangePlan::new(
            "NTNU".to_string(),
            "Netherlands - TU Delft".to_string(),
            "Datateknologi".to_string(),
            3,
            Term::Autumn,
        )
    }

    /// Store double that can be told to fail
    struct FlakyStore {
        fail: bool,
        created: usize,
    }

    impl FlakyStore {
        const fn new(fail: bool) -> Self {
            Self { fail, created: 0 }
        }
    }

    impl PlanStore for FlakyStore {
        fn create_plan(&mut self, _payload: &PlanPayload) -> Result<String, Box<dyn Error>> {
            if self.fail {
                return Err("store unavailable".into());
            }
            self.created += 1;
            Ok(format!("plan-{}", self.created))
        }

        fn update_plan(&mut self, _id: &str, _payload: &PlanPayload) -> Result<(), Box<dyn Error>> {
            if self.fail {
                return Err("store unavailable".into());
            }
            Ok(())
        }

        fn delete_plan(&mut self, _id: &str) -> Result<(), Box<dyn Error>> {
            if self.fail {
                return Err("store unavailable".into());
            }
            Ok(())
        }

        fn list_plans(&self, _owner_id: &str) -> Result<Vec<ExchangePlan>, Box<dyn Error>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_payload_round_trip() {
        let mut original = plan();
        original.plan_name = Some("Utveksling høst".to_string());
        original.specialization = Some("Kunstig intelligens".to_string());

        let payload = PlanPayload::from_plan(&original, "student-1");
        assert_eq!(payload.owner_id, "student-1");

        let rebuilt = payload.into_plan(original.id.clone());
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn test_save_swaps_temp_id_on_success() {
        let mut shelf = PlanShelf::new("student-1".to_string());
        let mut store = FlakyStore::new(false);

        let new_plan = plan();
        let temp = new_plan.id.clone();

        let durable = shelf.save_plan(&mut store, new_plan).unwrap();
        assert_eq!(durable, "plan-1");
        assert!(shelf.plan(&temp).is_none());
        assert!(shelf.plan("plan-1").is_some());
        assert!(!shelf.plan("plan-1").unwrap().has_temp_id());
    }

    #[test]
    fn test_temp_id_resolves_before_swap() {
        let mut shelf = PlanShelf::new("student-1".to_string());
        let mut store = FlakyStore::new(true);

        let new_plan = plan();
        let temp = new_plan.id.clone();

        // Failed save rolls back, so the plan is gone entirely
        assert!(shelf.save_plan(&mut store, new_plan.clone()).is_err());
        assert!(shelf.plan(&temp).is_none());

        // Re-adding by hand: operations addressed to the temp id hit the
        // same in-memory object
        shelf.plans.push(new_plan);
        shelf.plan_mut(&temp).unwrap().plan_name = Some("X".to_string());
        assert_eq!(shelf.plan(&temp).unwrap().plan_name.as_deref(), Some("X"));
    }

    #[test]
    fn test_failed_update_rolls_back_snapshot() {
        let mut shelf = PlanShelf::new("student-1".to_string());
        let mut ok_store = FlakyStore::new(false);

        let mut saved = plan();
        saved.plan_name = Some("Original".to_string());
        let id = shelf.save_plan(&mut ok_store, saved).unwrap();

        let mut edited = shelf.plan(&id).unwrap().clone();
        edited.plan_name = Some("Edited".to_string());

        let mut bad_store = FlakyStore::new(true);
        assert!(shelf.save_plan(&mut bad_store, edited).is_err());

        // The whole prior snapshot is restored, not individual fields
        assert_eq!(
            shelf.plan(&id).unwrap().plan_name.as_deref(),
            Some("Original")
        );
    }

    #[test]
    fn test_failed_delete_rolls_back() {
        let mut shelf = PlanShelf::new("student-1".to_string());
        let mut ok_store = FlakyStore::new(false);
        let id = shelf.save_plan(&mut ok_store, plan()).unwrap();

        let mut bad_store = FlakyStore::new(true);
        assert!(shelf.delete_plan(&mut bad_store, &id).is_err());
        assert!(shelf.plan(&id).is_some());

        assert!(shelf.delete_plan(&mut ok_store, &id).is_ok());
        assert!(shelf.plan(&id).is_none());
    }

    #[test]
    fn test_delete_unpersisted_plan_skips_store() {
        let mut shelf = PlanShelf::new("student-1".to_string());
        let unsaved = plan();
        let temp = unsaved.id.clone();
        shelf.plans.push(unsaved);

        // A failing store is never consulted for a temp-id plan
        let mut bad_store = FlakyStore::new(true);
        assert!(shelf.delete_plan(&mut bad_store, &temp).is_ok());
        assert!(shelf.plans().is_empty());
    }
}

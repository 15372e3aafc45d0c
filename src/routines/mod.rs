//! Routine engine. [RoutineTracker] owns the in-memory store and is the only thing that mutates
//! it. Every mutation is persisted right away through [RoutineStorage] and recorded through
//! [ActivityLog].

pub mod entities;
pub mod error;
pub mod flow;

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::NaiveDateTime;
use entities::{Lifetime, NewRoutine, RoutineEntity};
use error::TrackerError;
use tracing::{debug, info};

use crate::{
    storage::{activity_log::ActivityLog, routine_storage::RoutineStorage},
    utils::{
        clock::Clock,
        time::{format_date, format_time},
    },
};

/// Routines keyed by their unique name.
pub type RoutineMap = BTreeMap<String, RoutineEntity>;

/// A routine as it should be displayed right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineRow {
    pub name: String,
    pub routine: RoutineEntity,
    pub completable: bool,
}

pub struct RoutineTracker<S: RoutineStorage, L: ActivityLog> {
    storage: S,
    activity_log: L,
    clock: Box<dyn Clock>,
    routines: RoutineMap,
}

impl<S: RoutineStorage, L: ActivityLog> RoutineTracker<S, L> {
    pub async fn load(storage: S, activity_log: L, clock: Box<dyn Clock>) -> Result<Self> {
        let routines = storage.load().await?;
        Ok(Self {
            storage,
            activity_log,
            clock,
            routines,
        })
    }

    pub fn routines(&self) -> &RoutineMap {
        &self.routines
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Drops expired temporary routines, persists the result and returns what should be shown.
    pub async fn refresh(&mut self) -> Result<Vec<RoutineRow>> {
        let now = self.clock.now();
        let today = now.date();

        self.routines.retain(|name, routine| {
            let expired = routine.is_expired(today);
            if expired {
                info!("Routine {name:?} expired on {:?}", routine.end_date);
            }
            !expired
        });
        self.storage.save(&self.routines).await?;

        Ok(self
            .routines
            .iter()
            .map(|(name, routine)| RoutineRow {
                name: name.clone(),
                routine: routine.clone(),
                completable: routine.is_completable(now),
            })
            .collect())
    }

    /// Inserts a routine. A routine with the same name is replaced.
    pub async fn add(&mut self, routine: NewRoutine) -> Result<Vec<RoutineRow>> {
        let message = describe_addition(&routine);
        let (name, entity) = routine.into_entity();
        if self.routines.insert(name.clone(), entity).is_some() {
            debug!("Routine {name:?} replaced an existing one");
        }

        self.storage.save(&self.routines).await?;
        self.activity_log.append(&message).await?;
        info!("Added routine {name:?}");

        self.refresh().await
    }

    /// Marks a routine as done today. Whether it is allowed right now is decided by whoever shows
    /// the routine, see [RoutineRow::completable].
    pub async fn complete(&mut self, name: &str) -> Result<Vec<RoutineRow>> {
        let today = self.clock.today();
        let Some(routine) = self.routines.get_mut(name) else {
            return Err(TrackerError::UnknownRoutine(name.to_string()).into());
        };
        routine.mark_completed(today);
        let streak = routine.streak;

        self.storage.save(&self.routines).await?;
        self.activity_log
            .append(&format!("Completed routine: {name}"))
            .await?;
        info!("Completed routine {name:?}, streak is now {streak}");

        self.refresh().await
    }
}

fn describe_addition(routine: &NewRoutine) -> String {
    let (temporary, end_date) = match routine.lifetime {
        Lifetime::Permanent => ("False", "None".to_string()),
        Lifetime::Until(date) => ("True", format_date(date)),
    };
    format!(
        "Added routine: {}, Category: {} at {}, Temporary: {temporary}, End Date: {end_date}",
        routine.name,
        routine.category,
        format_time(routine.time),
    )
}

//! # Palette Reconciliation
//!
//! Inspects a process-object snapshot and issues corrective writes:
//! seeding the default communication set, seeding missing connector
//! gates, and deleting deprecated connector defaults.
//!
//! The pass is idempotent against its own output: run it on a snapshot
//! that already contains everything it would create (and nothing it
//! would delete) and it issues zero writes. Every corrective write is
//! independent; a failed one is logged and the rest are still attempted.
//!
//! Two clients joining an empty board at the same time can both observe
//! "no communication objects" and both seed the set. The store has no
//! at-most-once guard, so duplicates are possible; this is a known,
//! accepted race.

use processorix_model::{ObjectCategory, ProcessObject, SessionId};
use processorix_store::{CollectionStore, EntityStore};
use tracing::{debug, warn};

use crate::defaults::{
    DEFAULT_COMMUNICATION_METHODS, DEFAULT_CONNECTOR_GATES, DEPRECATED_CONNECTOR_ICONS,
};

/// Outcome of one reconciliation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Objects created (seeded defaults).
    pub created: usize,
    /// Objects removed (deprecated defaults).
    pub removed: usize,
    /// Corrective writes that failed and were dropped.
    pub failed: usize,
}

impl ReconcileReport {
    /// Whether the pass issued no writes at all.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.created == 0 && self.removed == 0 && self.failed == 0
    }
}

/// Runs one reconciliation pass over an objects snapshot.
pub fn reconcile_objects<S: EntityStore>(
    store: &S,
    session: &SessionId,
    objects: &[ProcessObject],
) -> ReconcileReport {
    let mut report = ReconcileReport::default();
    let mut rng = rand::thread_rng();

    // Communication set: presence of any communication object at all
    // counts as seeded, so user-created methods suppress the defaults.
    if !objects.iter().any(|o| o.category.is_communication()) {
        debug!(session = %session, "seeding default communication methods");
        for template in &DEFAULT_COMMUNICATION_METHODS {
            let object = ProcessObject::new(
                &mut rng,
                template.name,
                template.icon,
                template.color,
                ObjectCategory::Communication {
                    profile: template.profile,
                },
            );
            match store.create(session, object) {
                Ok(()) => report.created += 1,
                Err(error) => {
                    warn!(session = %session, name = template.name, %error,
                        "dropped communication default seed");
                    report.failed += 1;
                }
            }
        }
    }

    // Connector gates: three independent, order-insensitive checks.
    for template in &DEFAULT_CONNECTOR_GATES {
        let present = objects
            .iter()
            .any(|o| o.category.is_connector() && o.icon == template.icon);
        if present {
            continue;
        }
        let object = ProcessObject::new(
            &mut rng,
            template.name,
            template.icon,
            template.color,
            ObjectCategory::Connector,
        )
        .with_description(template.description);
        match store.create(session, object) {
            Ok(()) => report.created += 1,
            Err(error) => {
                warn!(session = %session, name = template.name, %error,
                    "dropped connector gate seed");
                report.failed += 1;
            }
        }
    }

    // Deprecated connector defaults are deleted on sight.
    for object in objects {
        if !object.category.is_connector() {
            continue;
        }
        if !DEPRECATED_CONNECTOR_ICONS.contains(&object.icon.as_str()) {
            continue;
        }
        match CollectionStore::<ProcessObject>::remove(store, session, &object.id) {
            Ok(()) => report.removed += 1,
            Err(error) => {
                warn!(session = %session, id = %object.id, %error,
                    "dropped deprecated connector cleanup");
                report.failed += 1;
            }
        }
    }

    report
}

//! Feedback loop detection over cyclic strongly connected components.

use chrono::Utc;
use keel_core::errors::AnalysisResult;
use keel_core::models::{FeedbackLoop, LoopSeverity, LoopType};
use keel_core::traits::AnalysisStore;
use keel_core::types::collections::{FxHashMap, FxHashSet};
use xxhash_rust::xxh3::xxh3_64;

use crate::graph::{find_strongly_connected_components, GraphSnapshot, StronglyConnectedComponent};

/// Detector confidence at or above which a loop counts as densely connected.
const DENSE_CONFIDENCE: f64 = 0.9;

/// Deterministic loop id from the member set. Order of `members` is irrelevant.
pub fn loop_id(members: &[String]) -> String {
    let mut sorted: Vec<&str> = members.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    format!("loop-{:016x}", xxh3_64(sorted.join("\n").as_bytes()))
}

/// Classify every SCC with more than one member. Ordered by id.
pub fn detect_feedback_loops(snapshot: &GraphSnapshot) -> Vec<FeedbackLoop> {
    loops_from_components(snapshot, &find_strongly_connected_components(snapshot))
}

/// [`detect_feedback_loops`] over components already computed from `snapshot`.
pub fn loops_from_components(
    snapshot: &GraphSnapshot,
    components: &[StronglyConnectedComponent],
) -> Vec<FeedbackLoop> {
    let now = Utc::now();
    let mut loops: Vec<FeedbackLoop> = components
        .iter()
        .filter(|c| c.is_cyclic())
        .map(|component| {
            let shape = LoopShape::measure(snapshot, component);
            let loop_type = shape.loop_type();
            let confidence = shape.confidence();
            FeedbackLoop {
                id: loop_id(&component.members),
                entities: component.members.clone(),
                loop_type,
                cycle_length: component.len(),
                severity: severity(component.len(), confidence),
                confidence,
                resolved: false,
                detected_at: now,
            }
        })
        .collect();
    loops.sort_by(|a, b| a.id.cmp(&b.id));
    loops
}

/// Detect loops and persist them. Re-detected loops supersede their stored copies.
pub fn detect_and_store_feedback_loops(
    store: &dyn AnalysisStore,
    snapshot: &GraphSnapshot,
) -> AnalysisResult<Vec<FeedbackLoop>> {
    let loops = detect_feedback_loops(snapshot);
    store_detected_loops(store, &loops)?;
    Ok(loops)
}

/// Persist loops produced by [`detect_feedback_loops`] or [`loops_from_components`].
pub fn store_detected_loops(store: &dyn AnalysisStore, loops: &[FeedbackLoop]) -> AnalysisResult<()> {
    store.store_feedback_loops(loops)?;
    tracing::info!(
        loops = loops.len(),
        critical = loops.iter().filter(|l| l.severity == LoopSeverity::Critical).count(),
        "stored feedback loops"
    );
    Ok(())
}

/// `size >= 5` is critical, 3..=4 moderate, 2 low. Loops of three or more
/// members move up one level when densely connected.
fn severity(size: usize, confidence: f64) -> LoopSeverity {
    let base = match size {
        s if s >= 5 => LoopSeverity::Critical,
        3 | 4 => LoopSeverity::Moderate,
        _ => LoopSeverity::Low,
    };
    if size >= 3 && confidence >= DENSE_CONFIDENCE {
        base.escalate()
    } else {
        base
    }
}

/// Internal edge structure of one component. Self-loops are ignored.
struct LoopShape {
    size: usize,
    internal_edges: usize,
    /// Every member has exactly one internal predecessor and one internal successor.
    is_ring: bool,
}

impl LoopShape {
    fn measure(snapshot: &GraphSnapshot, component: &StronglyConnectedComponent) -> Self {
        let members: FxHashSet<&str> = component.members.iter().map(String::as_str).collect();
        let mut in_degree: FxHashMap<&str, usize> = FxHashMap::default();
        let mut is_ring = true;
        let mut internal_edges = 0;

        for member in &component.members {
            let out = snapshot
                .forward()
                .successors(member)
                .filter(|s| *s != member.as_str() && members.contains(s))
                .inspect(|s| *in_degree.entry(*s).or_default() += 1)
                .count();
            internal_edges += out;
            is_ring &= out == 1;
        }
        is_ring &= component.members.iter().all(|m| in_degree.get(m.as_str()) == Some(&1));

        Self {
            size: component.len(),
            internal_edges,
            is_ring,
        }
    }

    fn density(&self) -> f64 {
        let possible = self.size * self.size.saturating_sub(1);
        if possible == 0 {
            0.0
        } else {
            self.internal_edges as f64 / possible as f64
        }
    }

    fn confidence(&self) -> f64 {
        (0.5 + 0.5 * self.density()).clamp(0.5, 1.0)
    }

    fn loop_type(&self) -> LoopType {
        if self.size == 2 {
            LoopType::MutualRecursion
        } else if self.is_ring {
            LoopType::CircularImport
        } else {
            LoopType::StateCycle
        }
    }
}

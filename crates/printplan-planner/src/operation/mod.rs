//! Print operation tree
//!
//! Every node is an [`OperationPtr`]: a shared handle to either an atomic move
//! or a sequence of child operations. Parents own their children; children
//! keep a weak link back to their parent so the tree can be walked upwards.
//! A node belongs to at most one sequence at a time and handle identity is
//! node identity.
//!
//! All structural changes go through the parent sequence
//! ([`OperationPtr::append_operation`], [`OperationPtr::remove_operation`],
//! [`OperationPtr::insert_operation_after`], [`OperationPtr::set_operations`]),
//! which keep the parent links consistent.

pub mod moves;
pub mod sequence;

use std::cell::{Ref, RefMut};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use printplan_core::{shared, Coord, Point3, PrintFeatureType, Shared, WeakShared};

pub use moves::{ExtrusionMove, TravelMove};
pub use sequence::{FeatureExtrusionInfo, OperationSequence, SequenceKind};

use crate::error::{OperationError, OperationResult};
use crate::export::PlanExporter;
use crate::travel::SpeedDerivatives;

/// Direction in which children are visited by searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchOrder {
    #[default]
    Forward,
    Backward,
}

/// Payload of a tree node
#[derive(Debug, Clone)]
pub enum OperationKind {
    Extrusion(ExtrusionMove),
    Travel(TravelMove),
    Sequence(OperationSequence),
}

/// A node of the operation tree
#[derive(Debug)]
pub struct PrintOperation {
    parent: Option<WeakShared<PrintOperation>>,
    kind: OperationKind,
}

impl PrintOperation {
    pub fn kind(&self) -> &OperationKind {
        &self.kind
    }

    pub fn has_parent(&self) -> bool {
        self.parent.as_ref().is_some_and(|parent| parent.strong_count() > 0)
    }
}

/// Shared handle to a tree node
#[derive(Clone)]
pub struct OperationPtr(Shared<PrintOperation>);

impl OperationPtr {
    pub fn new(kind: OperationKind) -> Self {
        Self(shared(PrintOperation { parent: None, kind }))
    }

    pub fn extrusion_move(extrusion: ExtrusionMove) -> Self {
        Self::new(OperationKind::Extrusion(extrusion))
    }

    pub fn travel_move(position: Point3) -> Self {
        Self::new(OperationKind::Travel(TravelMove::new(position)))
    }

    pub fn sequence(kind: SequenceKind) -> Self {
        Self::new(OperationKind::Sequence(OperationSequence::new(kind)))
    }

    /// A closed loop; it starts where its last move ends
    pub fn closed_sequence() -> Self {
        Self::sequence(SequenceKind::ContinuousMoves {
            closed: true,
            start_position: None,
        })
    }

    /// An open line starting at `start_position`
    pub fn open_sequence(start_position: Point3) -> Self {
        Self::sequence(SequenceKind::ContinuousMoves {
            closed: false,
            start_position: Some(start_position),
        })
    }

    pub fn travel_route(feature_type: PrintFeatureType, speed: SpeedDerivatives) -> Self {
        Self::sequence(SequenceKind::TravelRoute {
            feature_type,
            speed,
        })
    }

    pub fn feature_extrusion(info: FeatureExtrusionInfo) -> Self {
        Self::sequence(SequenceKind::FeatureExtrusion(info))
    }

    pub fn extruder_plan(extruder_nr: usize) -> Self {
        Self::sequence(SequenceKind::ExtruderPlan {
            extruder_nr,
            temperature: None,
            wait: false,
        })
    }

    /// An extruder plan that starts with a temperature command
    pub fn extruder_plan_with_temperature(extruder_nr: usize, temperature: f64, wait: bool) -> Self {
        Self::sequence(SequenceKind::ExtruderPlan {
            extruder_nr,
            temperature: Some(temperature),
            wait,
        })
    }

    pub fn layer_change(layer_index: i64) -> Self {
        Self::sequence(SequenceKind::LayerChange { layer_index })
    }

    pub fn layer_plan(layer_index: i64, z: Coord) -> Self {
        Self::sequence(SequenceKind::LayerPlan { layer_index, z })
    }

    pub fn print_plan() -> Self {
        Self::sequence(SequenceKind::PrintPlan)
    }

    pub fn borrow(&self) -> Ref<'_, PrintOperation> {
        self.0.borrow()
    }

    fn borrow_mut(&self) -> RefMut<'_, PrintOperation> {
        self.0.borrow_mut()
    }

    /// The sequence currently owning this operation
    pub fn parent(&self) -> Option<OperationPtr> {
        self.borrow()
            .parent
            .as_ref()
            .and_then(|parent| parent.upgrade())
            .map(OperationPtr)
    }

    fn set_parent(&self, parent: Option<&OperationPtr>) {
        self.borrow_mut().parent = parent.map(|parent| Rc::downgrade(&parent.0));
    }

    /// Whether `ancestor` is found by walking up the parent links
    pub fn has_ancestor(&self, ancestor: &OperationPtr) -> bool {
        let mut current = self.parent();
        while let Some(parent) = current {
            if &parent == ancestor {
                return true;
            }
            current = parent.parent();
        }
        false
    }

    /// First ancestor matching `predicate`, nearest first
    pub fn find_parent<F>(&self, predicate: F) -> Option<OperationPtr>
    where
        F: Fn(&OperationPtr) -> bool,
    {
        let mut current = self.parent();
        while let Some(parent) = current {
            if predicate(&parent) {
                return Some(parent);
            }
            current = parent.parent();
        }
        None
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self.borrow().kind, OperationKind::Sequence(_))
    }

    fn sequence_matches(&self, predicate: impl Fn(&SequenceKind) -> bool) -> bool {
        match &self.borrow().kind {
            OperationKind::Sequence(sequence) => predicate(&sequence.kind),
            _ => false,
        }
    }

    pub fn is_extrusion_move(&self) -> bool {
        matches!(self.borrow().kind, OperationKind::Extrusion(_))
    }

    pub fn is_travel_move(&self) -> bool {
        matches!(self.borrow().kind, OperationKind::Travel(_))
    }

    pub fn is_continuous_sequence(&self) -> bool {
        self.sequence_matches(|kind| matches!(kind, SequenceKind::ContinuousMoves { .. }))
    }

    pub fn is_travel_route(&self) -> bool {
        self.sequence_matches(|kind| matches!(kind, SequenceKind::TravelRoute { .. }))
    }

    pub fn is_feature_extrusion(&self) -> bool {
        self.sequence_matches(|kind| matches!(kind, SequenceKind::FeatureExtrusion(_)))
    }

    pub fn is_extruder_plan(&self) -> bool {
        self.sequence_matches(|kind| matches!(kind, SequenceKind::ExtruderPlan { .. }))
    }

    pub fn is_layer_plan(&self) -> bool {
        self.sequence_matches(|kind| matches!(kind, SequenceKind::LayerPlan { .. }))
    }

    pub fn is_print_plan(&self) -> bool {
        self.sequence_matches(|kind| matches!(kind, SequenceKind::PrintPlan))
    }

    pub fn sequence_kind(&self) -> Option<SequenceKind> {
        match &self.borrow().kind {
            OperationKind::Sequence(sequence) => Some(sequence.kind.clone()),
            _ => None,
        }
    }

    /// Target position of a move
    pub fn position(&self) -> Option<Point3> {
        match &self.borrow().kind {
            OperationKind::Extrusion(extrusion) => Some(extrusion.position),
            OperationKind::Travel(travel) => Some(travel.position),
            OperationKind::Sequence(_) => None,
        }
    }

    pub fn extrusion(&self) -> Option<ExtrusionMove> {
        match &self.borrow().kind {
            OperationKind::Extrusion(extrusion) => Some(*extrusion),
            _ => None,
        }
    }

    pub fn feature_info(&self) -> Option<FeatureExtrusionInfo> {
        match self.sequence_kind() {
            Some(SequenceKind::FeatureExtrusion(info)) => Some(info),
            _ => None,
        }
    }

    /// Feature type of a feature extrusion or travel route
    pub fn feature_type(&self) -> Option<PrintFeatureType> {
        match self.sequence_kind()? {
            SequenceKind::FeatureExtrusion(info) => Some(info.feature_type),
            SequenceKind::TravelRoute { feature_type, .. } => Some(feature_type),
            _ => None,
        }
    }

    /// Closed flag of a continuous move sequence
    pub fn is_closed(&self) -> Option<bool> {
        match self.sequence_kind()? {
            SequenceKind::ContinuousMoves { closed, .. } => Some(closed),
            _ => None,
        }
    }

    pub fn extruder_nr(&self) -> Option<usize> {
        match self.sequence_kind()? {
            SequenceKind::ExtruderPlan { extruder_nr, .. } => Some(extruder_nr),
            _ => None,
        }
    }

    /// Layer index of a layer plan or layer change
    pub fn layer_index(&self) -> Option<i64> {
        match self.sequence_kind()? {
            SequenceKind::LayerPlan { layer_index, .. }
            | SequenceKind::LayerChange { layer_index } => Some(layer_index),
            _ => None,
        }
    }

    /// Snapshot of the children; empty for moves
    pub fn operations(&self) -> Vec<OperationPtr> {
        match &self.borrow().kind {
            OperationKind::Sequence(sequence) => sequence.operations.clone(),
            _ => Vec::new(),
        }
    }

    /// Snapshot of the children matching `predicate`
    pub fn operations_of<F>(&self, predicate: F) -> Vec<OperationPtr>
    where
        F: Fn(&OperationPtr) -> bool,
    {
        self.operations()
            .into_iter()
            .filter(|operation| predicate(operation))
            .collect()
    }

    pub fn len(&self) -> usize {
        match &self.borrow().kind {
            OperationKind::Sequence(sequence) => sequence.operations.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_children_mut<R>(&self, f: impl FnOnce(&mut Vec<OperationPtr>) -> R) -> Option<R> {
        match &mut self.borrow_mut().kind {
            OperationKind::Sequence(sequence) => Some(f(&mut sequence.operations)),
            _ => None,
        }
    }

    fn check_can_adopt(&self, operation: &OperationPtr) -> OperationResult<()> {
        if !self.is_sequence() {
            tracing::error!("Trying to add a child to a move: {:?}", self);
            return Err(OperationError::NotASequence);
        }
        if operation == self || self.has_ancestor(operation) {
            tracing::error!("Trying to add an operation to itself or one of its descendants");
            return Err(OperationError::CycleDetected);
        }
        Ok(())
    }

    fn detach_child(&self, operation: &OperationPtr) {
        self.with_children_mut(|children| children.retain(|child| child != operation));
        operation.set_parent(None);
    }

    /// Append `operation`, detaching it from its current parent first
    ///
    /// Appending an operation that is already a child leaves it in place.
    pub fn append_operation(&self, operation: &OperationPtr) -> OperationResult<()> {
        self.check_can_adopt(operation)?;

        if let Some(parent) = operation.parent() {
            if &parent == self {
                return Ok(());
            }
            parent.detach_child(operation);
        }

        self.with_children_mut(|children| children.push(operation.clone()));
        operation.set_parent(Some(self));
        Ok(())
    }

    /// Remove a child; fails without touching the tree if `operation` is not a child
    pub fn remove_operation(&self, operation: &OperationPtr) -> OperationResult<()> {
        match operation.parent() {
            Some(parent) if &parent == self => {
                self.detach_child(operation);
                Ok(())
            }
            _ => {
                tracing::error!("Trying to remove an operation that is currently not a child");
                Err(OperationError::NotAChild)
            }
        }
    }

    /// Insert `operation` right after the child `after`
    ///
    /// If `after` is not a child, `operation` is appended instead.
    pub fn insert_operation_after(
        &self,
        operation: &OperationPtr,
        after: &OperationPtr,
    ) -> OperationResult<()> {
        self.check_can_adopt(operation)?;
        if operation == after {
            return Ok(());
        }

        if let Some(parent) = operation.parent() {
            parent.detach_child(operation);
        }

        let inserted = self
            .with_children_mut(|children| match children.iter().position(|child| child == after) {
                Some(index) => {
                    children.insert(index + 1, operation.clone());
                    true
                }
                None => {
                    children.push(operation.clone());
                    false
                }
            })
            .unwrap_or(false);
        operation.set_parent(Some(self));

        if !inserted {
            tracing::error!("The operation to insert after is not a child, appending instead");
        }
        Ok(())
    }

    /// Replace all children
    ///
    /// Children missing from `operations` are orphaned; new ones are detached
    /// from their previous parent.
    pub fn set_operations(&self, operations: Vec<OperationPtr>) -> OperationResult<()> {
        if !self.is_sequence() {
            tracing::error!("Trying to set the children of a move: {:?}", self);
            return Err(OperationError::NotASequence);
        }
        for operation in &operations {
            self.check_can_adopt(operation)?;
        }

        for previous in self.operations() {
            if !operations.contains(&previous) {
                previous.set_parent(None);
            }
        }
        for operation in &operations {
            if let Some(parent) = operation.parent() {
                if &parent != self {
                    parent.detach_child(operation);
                }
            }
        }

        for operation in &operations {
            operation.set_parent(Some(self));
        }
        self.with_children_mut(|children| *children = operations);
        Ok(())
    }

    fn ordered_children(&self, order: SearchOrder) -> Vec<OperationPtr> {
        let mut children = self.operations();
        if order == SearchOrder::Backward {
            children.reverse();
        }
        children
    }

    /// Depth-first search testing each node before its subtree
    ///
    /// `max_depth` of `Some(0)` only looks at the immediate children, `None`
    /// searches the whole subtree.
    pub fn find_operation<F>(
        &self,
        predicate: &F,
        order: SearchOrder,
        max_depth: Option<usize>,
    ) -> Option<OperationPtr>
    where
        F: Fn(&OperationPtr) -> bool,
    {
        let children = self.ordered_children(order);

        if max_depth == Some(0) {
            return children.into_iter().find(|child| predicate(child));
        }

        let next_depth = max_depth.map(|depth| depth - 1);
        for child in children {
            if predicate(&child) {
                return Some(child);
            }
            if let Some(found) = child.find_operation(predicate, order, next_depth) {
                return Some(found);
            }
        }
        None
    }

    /// Every match of [`OperationPtr::find_operation`], in traversal order
    pub fn find_operations<F>(
        &self,
        predicate: &F,
        order: SearchOrder,
        max_depth: Option<usize>,
    ) -> Vec<OperationPtr>
    where
        F: Fn(&OperationPtr) -> bool,
    {
        let mut found = Vec::new();
        self.collect_operations(predicate, order, max_depth, &mut found);
        found
    }

    fn collect_operations<F>(
        &self,
        predicate: &F,
        order: SearchOrder,
        max_depth: Option<usize>,
        found: &mut Vec<OperationPtr>,
    ) where
        F: Fn(&OperationPtr) -> bool,
    {
        let children = self.ordered_children(order);

        if max_depth == Some(0) {
            found.extend(children.into_iter().filter(|child| predicate(child)));
            return;
        }

        let next_depth = max_depth.map(|depth| depth - 1);
        for child in children {
            if predicate(&child) {
                found.push(child.clone());
            }
            child.collect_operations(predicate, order, next_depth, found);
        }
    }

    /// Where the print head is when this operation starts printing
    ///
    /// A single move only knows where it ends, so moves have no start position.
    pub fn find_start_position(&self) -> Option<Point3> {
        match &self.borrow().kind {
            OperationKind::Extrusion(_) | OperationKind::Travel(_) => None,
            OperationKind::Sequence(sequence) => match &sequence.kind {
                SequenceKind::ContinuousMoves { closed: true, .. } => sequence
                    .operations
                    .iter()
                    .rev()
                    .find_map(OperationPtr::find_end_position),
                SequenceKind::ContinuousMoves {
                    closed: false,
                    start_position,
                } => *start_position,
                _ => sequence
                    .operations
                    .iter()
                    .find_map(OperationPtr::find_start_position),
            },
        }
    }

    /// Where the print head is once this operation is printed
    pub fn find_end_position(&self) -> Option<Point3> {
        match &self.borrow().kind {
            OperationKind::Extrusion(extrusion) => Some(extrusion.position),
            OperationKind::Travel(travel) => Some(travel.position),
            OperationKind::Sequence(sequence) => sequence
                .operations
                .iter()
                .rev()
                .find_map(OperationPtr::find_end_position),
        }
    }

    /// Emit this subtree to `exporter` in print order
    pub fn write(&self, exporter: &mut dyn PlanExporter) {
        self.write_in_route(exporter, None);
    }

    fn write_in_route(&self, exporter: &mut dyn PlanExporter, route: Option<(f64, PrintFeatureType)>) {
        match &self.borrow().kind {
            OperationKind::Extrusion(extrusion) => exporter.write_extrusion_move(
                extrusion.position,
                extrusion.line_width_start,
                extrusion.line_width_end,
                extrusion.speed,
                extrusion.flow_ratio,
            ),
            OperationKind::Travel(travel) => {
                let (speed, feature_type) = route.unwrap_or_else(|| {
                    tracing::warn!("Travel move to {} written outside of a travel route", travel.position);
                    (0.0, PrintFeatureType::MoveCombing)
                });
                exporter.write_travel_move(travel.position, speed, feature_type);
            }
            OperationKind::Sequence(sequence) => {
                let route = match &sequence.kind {
                    SequenceKind::ExtruderPlan {
                        extruder_nr,
                        temperature: Some(temperature),
                        wait,
                    } => {
                        exporter.write_temperature_command(*extruder_nr, *temperature, *wait);
                        route
                    }
                    SequenceKind::LayerPlan { layer_index, z } => {
                        exporter.write_layer_start(*layer_index, *z);
                        route
                    }
                    SequenceKind::TravelRoute {
                        feature_type,
                        speed,
                    } => Some((speed.speed, *feature_type)),
                    _ => route,
                };

                for child in &sequence.operations {
                    child.write_in_route(exporter, route);
                }
            }
        }
    }

    /// Rotate a closed sequence so that it ends with `last_move`
    ///
    /// The loop then starts at the position of `last_move`.
    pub fn reorder_to_end_with(&self, last_move: &OperationPtr) -> OperationResult<()> {
        let mut operation = self.borrow_mut();
        let OperationKind::Sequence(sequence) = &mut operation.kind else {
            tracing::error!("Trying to reorder the children of a move");
            return Err(OperationError::NotASequence);
        };

        match sequence.kind {
            SequenceKind::ContinuousMoves { closed: true, .. } => {}
            SequenceKind::ContinuousMoves { closed: false, .. } => {
                tracing::error!("Trying to change the start of an open move sequence");
                return Err(OperationError::OpenSequenceReorder);
            }
            _ => {
                tracing::error!("Trying to reorder a {}", sequence.kind.name());
                return Err(OperationError::NotAContinuousSequence);
            }
        }

        let Some(index) = sequence.operations.iter().position(|child| child == last_move) else {
            tracing::error!("Trying to reorder a sequence with a move it does not contain");
            return Err(OperationError::MoveNotInSequence);
        };

        sequence.operations.rotate_left(index + 1);
        Ok(())
    }

    /// Print an open sequence backwards
    ///
    /// The last move position becomes the start position, every move targets
    /// the point it used to start from and its line widths are swapped.
    pub fn reverse(&self) -> OperationResult<()> {
        let mut operation = self.borrow_mut();
        let OperationKind::Sequence(sequence) = &mut operation.kind else {
            tracing::error!("Trying to reverse a move");
            return Err(OperationError::NotASequence);
        };

        let start_position = match &mut sequence.kind {
            SequenceKind::ContinuousMoves {
                closed: false,
                start_position,
            } => start_position,
            SequenceKind::ContinuousMoves { closed: true, .. } => {
                tracing::error!("Reversing a closed move sequence is not supported");
                return Err(OperationError::ClosedSequenceReverse);
            }
            other => {
                tracing::error!("Trying to reverse a {}", other.name());
                return Err(OperationError::NotAContinuousSequence);
            }
        };

        let Some(mut previous) = *start_position else {
            tracing::warn!("Open move sequence without start position left unchanged");
            return Ok(());
        };

        for child in &sequence.operations {
            match &mut child.borrow_mut().kind {
                OperationKind::Extrusion(extrusion) => {
                    let target = extrusion.position;
                    extrusion.position = previous;
                    std::mem::swap(&mut extrusion.line_width_start, &mut extrusion.line_width_end);
                    previous = target;
                }
                OperationKind::Travel(travel) => {
                    let target = travel.position;
                    travel.position = previous;
                    previous = target;
                }
                OperationKind::Sequence(_) => {
                    tracing::warn!("Nested sequence left untouched while reversing");
                }
            }
        }

        sequence.operations.reverse();
        *start_position = Some(previous);
        Ok(())
    }

    fn describe(&self) -> String {
        match &self.borrow().kind {
            OperationKind::Extrusion(extrusion) => format!("extrusion move to {}", extrusion.position),
            OperationKind::Travel(travel) => format!("travel move to {}", travel.position),
            OperationKind::Sequence(sequence) => format!(
                "{} with {} operation(s)",
                sequence.kind.name(),
                sequence.operations.len()
            ),
        }
    }
}

impl PartialEq for OperationPtr {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for OperationPtr {}

impl Hash for OperationPtr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Rc::as_ptr(&self.0), state);
    }
}

impl fmt::Debug for OperationPtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(_) => write!(f, "OperationPtr({})", self.describe()),
            Err(_) => f.write_str("OperationPtr(<borrowed>)"),
        }
    }
}

impl From<ExtrusionMove> for OperationPtr {
    fn from(extrusion: ExtrusionMove) -> Self {
        Self::extrusion_move(extrusion)
    }
}

impl From<TravelMove> for OperationPtr {
    fn from(travel: TravelMove) -> Self {
        Self::new(OperationKind::Travel(travel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{ExportedInstruction, RecordingExporter};

    fn point(x: Coord, y: Coord) -> Point3 {
        Point3::new(x, y, 0)
    }

    fn extrusion(x: Coord, y: Coord) -> OperationPtr {
        ExtrusionMove::new(point(x, y), 400, 30.0).into()
    }

    fn open_line(start: Point3, points: &[(Coord, Coord)]) -> OperationPtr {
        let sequence = OperationPtr::open_sequence(start);
        for &(x, y) in points {
            sequence.append_operation(&extrusion(x, y)).unwrap();
        }
        sequence
    }

    fn closed_square() -> (OperationPtr, Vec<OperationPtr>) {
        let sequence = OperationPtr::closed_sequence();
        let moves: Vec<_> = [(100, 0), (100, 100), (0, 100), (0, 0)]
            .iter()
            .map(|&(x, y)| extrusion(x, y))
            .collect();
        for operation in &moves {
            sequence.append_operation(operation).unwrap();
        }
        (sequence, moves)
    }

    #[test]
    fn test_append_moves_between_parents() {
        let first = OperationPtr::closed_sequence();
        let second = OperationPtr::closed_sequence();
        let operation = extrusion(1, 1);

        first.append_operation(&operation).unwrap();
        second.append_operation(&operation).unwrap();

        assert!(first.is_empty());
        assert_eq!(second.operations(), vec![operation.clone()]);
        assert_eq!(operation.parent(), Some(second));
    }

    #[test]
    fn test_append_twice_is_a_no_op() {
        let sequence = OperationPtr::closed_sequence();
        let a = extrusion(1, 0);
        let b = extrusion(2, 0);
        sequence.append_operation(&a).unwrap();
        sequence.append_operation(&b).unwrap();
        sequence.append_operation(&a).unwrap();

        assert_eq!(sequence.operations(), vec![a, b]);
    }

    #[test]
    fn test_append_rejects_cycles() {
        let plan = OperationPtr::extruder_plan(0);
        let feature = OperationPtr::feature_extrusion(FeatureExtrusionInfo::new(
            PrintFeatureType::Infill,
            400,
        ));
        plan.append_operation(&feature).unwrap();

        assert_eq!(feature.append_operation(&plan), Err(OperationError::CycleDetected));
        assert_eq!(plan.append_operation(&plan), Err(OperationError::CycleDetected));
        assert_eq!(plan.operations(), vec![feature]);
    }

    #[test]
    fn test_append_to_move_is_rejected() {
        let operation = extrusion(0, 0);
        assert_eq!(
            operation.append_operation(&extrusion(1, 1)),
            Err(OperationError::NotASequence)
        );
    }

    #[test]
    fn test_remove_operation() {
        let sequence = OperationPtr::closed_sequence();
        let stranger = extrusion(5, 5);
        let child = extrusion(1, 1);
        sequence.append_operation(&child).unwrap();

        assert_eq!(sequence.remove_operation(&stranger), Err(OperationError::NotAChild));
        assert_eq!(sequence.len(), 1);

        sequence.remove_operation(&child).unwrap();
        assert!(sequence.is_empty());
        assert!(child.parent().is_none());
    }

    #[test]
    fn test_insert_operation_after() {
        let sequence = OperationPtr::closed_sequence();
        let a = extrusion(1, 0);
        let b = extrusion(2, 0);
        let c = extrusion(3, 0);
        sequence.append_operation(&a).unwrap();
        sequence.append_operation(&b).unwrap();

        sequence.insert_operation_after(&c, &a).unwrap();
        assert_eq!(sequence.operations(), vec![a.clone(), c.clone(), b.clone()]);

        // Moving an existing child
        sequence.insert_operation_after(&a, &b).unwrap();
        assert_eq!(sequence.operations(), vec![c.clone(), b.clone(), a.clone()]);

        // Unknown anchor falls back to append
        let d = extrusion(4, 0);
        sequence.insert_operation_after(&d, &extrusion(9, 9)).unwrap();
        assert_eq!(sequence.operations().last(), Some(&d));
        assert_eq!(d.parent(), Some(sequence));
    }

    #[test]
    fn test_set_operations_updates_parents() {
        let sequence = OperationPtr::closed_sequence();
        let other = OperationPtr::closed_sequence();
        let kept = extrusion(1, 0);
        let dropped = extrusion(2, 0);
        let adopted = extrusion(3, 0);
        sequence.append_operation(&kept).unwrap();
        sequence.append_operation(&dropped).unwrap();
        other.append_operation(&adopted).unwrap();

        sequence
            .set_operations(vec![adopted.clone(), kept.clone()])
            .unwrap();

        assert_eq!(sequence.operations(), vec![adopted.clone(), kept.clone()]);
        assert!(dropped.parent().is_none());
        assert!(other.is_empty());
        assert_eq!(adopted.parent(), Some(sequence));
    }

    #[test]
    fn test_positions_of_sequences() {
        let (square, _) = closed_square();
        assert_eq!(square.find_start_position(), Some(point(0, 0)));
        assert_eq!(square.find_end_position(), Some(point(0, 0)));

        let line = open_line(point(-10, 0), &[(0, 0), (10, 0)]);
        assert_eq!(line.find_start_position(), Some(point(-10, 0)));
        assert_eq!(line.find_end_position(), Some(point(10, 0)));

        let feature = OperationPtr::feature_extrusion(FeatureExtrusionInfo::new(
            PrintFeatureType::Skin,
            400,
        ));
        assert_eq!(feature.find_start_position(), None);
        feature.append_operation(&OperationPtr::closed_sequence()).unwrap();
        feature.append_operation(&line).unwrap();
        feature.append_operation(&OperationPtr::closed_sequence()).unwrap();
        assert_eq!(feature.find_start_position(), Some(point(-10, 0)));
        assert_eq!(feature.find_end_position(), Some(point(10, 0)));
    }

    #[test]
    fn test_find_operation_depth_and_order() {
        let plan = OperationPtr::extruder_plan(0);
        let feature = OperationPtr::feature_extrusion(FeatureExtrusionInfo::new(
            PrintFeatureType::Infill,
            400,
        ));
        let first = open_line(point(0, 0), &[(10, 0)]);
        let second = open_line(point(0, 10), &[(10, 10)]);
        plan.append_operation(&feature).unwrap();
        feature.append_operation(&first).unwrap();
        feature.append_operation(&second).unwrap();

        let is_line = |operation: &OperationPtr| operation.is_continuous_sequence();
        assert_eq!(plan.find_operation(&is_line, SearchOrder::Forward, Some(0)), None);
        assert_eq!(
            plan.find_operation(&is_line, SearchOrder::Forward, Some(1)),
            Some(first.clone())
        );
        assert_eq!(
            plan.find_operation(&is_line, SearchOrder::Backward, None),
            Some(second.clone())
        );

        let moves = plan.find_operations(
            &|operation: &OperationPtr| operation.is_extrusion_move(),
            SearchOrder::Forward,
            None,
        );
        assert_eq!(moves.len(), 2);
        assert_eq!(moves[0].position(), Some(point(10, 0)));

        let found = moves[1].find_parent(|operation| operation.is_feature_extrusion());
        assert_eq!(found, Some(feature));
    }

    #[test]
    fn test_reorder_closed_sequence() {
        let (square, moves) = closed_square();
        square.reorder_to_end_with(&moves[1]).unwrap();

        assert_eq!(
            square.operations(),
            vec![moves[2].clone(), moves[3].clone(), moves[0].clone(), moves[1].clone()]
        );
        assert_eq!(square.find_start_position(), Some(point(100, 100)));
    }

    #[test]
    fn test_reorder_errors_leave_tree_untouched() {
        let line = open_line(point(0, 0), &[(10, 0), (20, 0)]);
        let moves = line.operations();
        assert_eq!(
            line.reorder_to_end_with(&moves[0]),
            Err(OperationError::OpenSequenceReorder)
        );
        assert_eq!(line.operations(), moves);

        let (square, _) = closed_square();
        assert_eq!(
            square.reorder_to_end_with(&extrusion(0, 0)),
            Err(OperationError::MoveNotInSequence)
        );
    }

    #[test]
    fn test_reverse_open_sequence() {
        let line = OperationPtr::open_sequence(point(0, 0));
        line.append_operation(
            &ExtrusionMove::new(point(10, 0), 400, 30.0)
                .with_line_widths(300, 400)
                .into(),
        )
        .unwrap();
        line.append_operation(&extrusion(20, 0)).unwrap();
        line.append_operation(&extrusion(30, 0)).unwrap();

        line.reverse().unwrap();

        assert_eq!(line.find_start_position(), Some(point(30, 0)));
        let positions: Vec<_> = line.operations().iter().filter_map(OperationPtr::position).collect();
        assert_eq!(positions, vec![point(20, 0), point(10, 0), point(0, 0)]);

        let last = line.operations()[2].extrusion().unwrap();
        assert_eq!((last.line_width_start, last.line_width_end), (400, 300));
    }

    #[test]
    fn test_reverse_closed_sequence_is_unsupported() {
        let (square, moves) = closed_square();
        assert_eq!(square.reverse(), Err(OperationError::ClosedSequenceReverse));
        assert_eq!(square.operations(), moves);
    }

    #[test]
    fn test_write_emits_in_order() {
        let layer = OperationPtr::layer_plan(3, 800);
        let plan = OperationPtr::extruder_plan_with_temperature(1, 205.0, false);
        let route = OperationPtr::travel_route(
            PrintFeatureType::MoveCombing,
            SpeedDerivatives::new(150.0, 1000.0, 20.0),
        );
        route.append_operation(&OperationPtr::travel_move(point(5, 5))).unwrap();
        layer.append_operation(&plan).unwrap();
        plan.append_operation(&route).unwrap();
        plan.append_operation(&open_line(point(5, 5), &[(15, 5)])).unwrap();

        let mut exporter = RecordingExporter::new();
        layer.write(&mut exporter);

        assert_eq!(
            exporter.instructions(),
            &[
                ExportedInstruction::LayerStart { layer_index: 3, z: 800 },
                ExportedInstruction::Temperature {
                    extruder_nr: 1,
                    temperature: 205.0,
                    wait: false
                },
                ExportedInstruction::TravelMove {
                    position: point(5, 5),
                    speed: 150.0,
                    feature_type: PrintFeatureType::MoveCombing
                },
                ExportedInstruction::ExtrusionMove {
                    position: point(15, 5),
                    line_width_start: 400,
                    line_width_end: 400,
                    speed: 30.0,
                    flow_ratio: 1.0
                },
            ]
        );
    }

    #[test]
    fn test_dropping_parent_orphans_children() {
        let child = extrusion(1, 1);
        {
            let sequence = OperationPtr::closed_sequence();
            sequence.append_operation(&child).unwrap();
            assert!(child.borrow().has_parent());
        }
        assert!(child.parent().is_none());
        assert!(!child.borrow().has_parent());
    }
}

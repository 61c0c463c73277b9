//! Insert synthesized operations between matching children

use crate::error::OperationResult;
use crate::operation::OperationPtr;

/// Rule inserting an operation between pairs of children
///
/// Children are walked left to right. Once a child matches as first
/// operation, the following children are scanned for the next second match;
/// whatever [`InsertBetween::make_operation`] produces is inserted right
/// before it, and the walk resumes from that second operation.
pub trait InsertBetween {
    fn first_operation_matches(&self, operation: &OperationPtr) -> bool;

    fn second_operation_matches(&self, first: &OperationPtr, second: &OperationPtr) -> bool;

    fn make_operation(&self, first: &OperationPtr, second: &OperationPtr) -> Option<OperationPtr>;

    /// Apply the rule to the direct children of `sequence`, returning the number of insertions
    fn insert_between_children(&self, sequence: &OperationPtr) -> OperationResult<usize> {
        let mut children = sequence.operations();
        let mut inserted = 0;
        let mut index_first = 0;

        while index_first + 1 < children.len() {
            if !self.first_operation_matches(&children[index_first]) {
                index_first += 1;
                continue;
            }

            let second_match = (index_first + 1..children.len()).find(|&index_second| {
                self.second_operation_matches(&children[index_first], &children[index_second])
            });

            match second_match {
                Some(index_second) => {
                    match self.make_operation(&children[index_first], &children[index_second]) {
                        Some(operation) => {
                            children.insert(index_second, operation);
                            inserted += 1;
                            index_first = index_second + 1;
                        }
                        None => index_first = index_second,
                    }
                }
                None => index_first += 1,
            }
        }

        if inserted > 0 {
            sequence.set_operations(children)?;
        }
        Ok(inserted)
    }

    /// Apply the rule to every sequence of the subtree, children before parents
    fn insert_between_recursively(&self, operation: &OperationPtr) -> OperationResult<usize> {
        if !operation.is_sequence() {
            return Ok(0);
        }

        let mut inserted = 0;
        for child in operation.operations() {
            inserted += self.insert_between_recursively(&child)?;
        }
        inserted += self.insert_between_children(operation)?;
        Ok(inserted)
    }
}

//! Key path resolution shared by every accessor
//!
//! Segments are walked left to right. A collection reached by a segment with a
//! literal index uses that index and discards every remaining ambient index for
//! the rest of the walk. A collection reached without a literal index takes the
//! front ambient index, unless it is the last segment, in which case the whole
//! collection is the result. A literal index on anything other than a
//! collection is ignored and leaves the ambient indices untouched.

use super::error::{DataModelError, Result};
use super::indices::IndexContext;
use super::node::{NodeMut, NodeRef, SettableModelObject};
use super::path::{KeyPath, PathSegment};
use super::shape::{FieldKind, TypeShape};

/// Resolve `segments` of `path` starting at `root`.
///
/// `Ok(NodeRef::Null)` means a value along the way is not filled in.
pub(crate) fn resolve<'a>(
    root: NodeRef<'a>,
    path: &KeyPath,
    segments: &[PathSegment],
    indices: &mut IndexContext,
) -> Result<NodeRef<'a>> {
    let mut current = root;

    for (position, segment) in segments.iter().enumerate() {
        let is_last = position + 1 == segments.len();

        let object = match current {
            NodeRef::Object(object) => object,
            NodeRef::Null => return Ok(NodeRef::Null),
            NodeRef::Scalar(_) | NodeRef::Collection(_) => {
                return Err(DataModelError::unknown_field(path.to_string(), segment.name()));
            }
        };

        let child = object
            .field(segment.name())
            .ok_or_else(|| DataModelError::unknown_field(path.to_string(), segment.name()))?;

        current = match child {
            NodeRef::Collection(items) => {
                let index = match segment.index() {
                    Some(literal) => {
                        indices.discard();
                        literal
                    }
                    None if is_last => return Ok(child),
                    None => indices.next_index().ok_or_else(|| {
                        DataModelError::missing_index(path.to_string(), segment.name())
                    })?,
                };
                items.element(index).ok_or_else(|| {
                    DataModelError::index_out_of_range(
                        path.to_string(),
                        segment.name(),
                        index,
                        items.len(),
                    )
                })?
            }
            NodeRef::Null => return Ok(NodeRef::Null),
            other => {
                if segment.index().is_some() {
                    log::trace!("ignoring index on {} field '{}'", other.kind(), segment.name());
                }
                other
            }
        };
    }

    Ok(current)
}

/// Mutable counterpart of [`resolve`], without ambient indices
pub(crate) fn resolve_mut<'a>(
    root: &'a mut dyn SettableModelObject,
    path: &KeyPath,
    segments: &[PathSegment],
) -> Result<NodeMut<'a>> {
    let mut current = NodeMut::Object(root);

    for (position, segment) in segments.iter().enumerate() {
        let is_last = position + 1 == segments.len();

        let object = match current {
            NodeMut::Object(object) => object,
            NodeMut::Null => return Ok(NodeMut::Null),
            NodeMut::Scalar | NodeMut::Collection(_) => {
                return Err(DataModelError::unknown_field(path.to_string(), segment.name()));
            }
        };

        let child = object
            .field_mut(segment.name())
            .ok_or_else(|| DataModelError::unknown_field(path.to_string(), segment.name()))?;

        current = match child {
            NodeMut::Collection(items) => {
                let index = match segment.index() {
                    Some(literal) => literal,
                    None if is_last => return Ok(NodeMut::Collection(items)),
                    None => {
                        return Err(DataModelError::missing_index(
                            path.to_string(),
                            segment.name(),
                        ));
                    }
                };
                let len = items.len();
                items.element_mut(index).ok_or_else(|| {
                    DataModelError::index_out_of_range(path.to_string(), segment.name(), index, len)
                })?
            }
            NodeMut::Null => return Ok(NodeMut::Null),
            other => other,
        };
    }

    Ok(current)
}

/// Insert ambient indices into every collection segment of `path` by walking
/// the static shape of the model.
///
/// Segments that already carry a literal index keep it, and the ambient
/// indices left at that point are discarded. Once the ambient indices run out
/// the remaining collection segments stay unindexed.
pub(crate) fn add_indices(
    root: &'static TypeShape,
    path: &KeyPath,
    indices: &IndexContext,
) -> Result<KeyPath> {
    if indices.is_empty() {
        return Ok(path.clone());
    }

    let mut ambient = indices.clone();
    let mut shape = Some(root);
    let mut segments = Vec::with_capacity(path.len());

    for segment in path.segments() {
        let field = shape
            .and_then(|shape| shape.field(segment.name()))
            .ok_or_else(|| DataModelError::unknown_field(path.to_string(), segment.name()))?;

        match field.kind() {
            FieldKind::Collection(element) => {
                let indexed = match segment.index() {
                    Some(_) => {
                        ambient.discard();
                        segment.clone()
                    }
                    None => match ambient.next_index() {
                        Some(index) => segment.with_index(index),
                        None => segment.clone(),
                    },
                };
                segments.push(indexed);
                shape = Some(element());
            }
            FieldKind::Object(object) => {
                if segment.index().is_some() {
                    return Err(DataModelError::not_a_collection(path.to_string(), segment.name()));
                }
                segments.push(segment.clone());
                shape = Some(object());
            }
            FieldKind::Scalar => {
                if segment.index().is_some() {
                    return Err(DataModelError::not_a_collection(path.to_string(), segment.name()));
                }
                segments.push(segment.clone());
                shape = None;
            }
        }
    }

    Ok(KeyPath::from_segments(segments))
}

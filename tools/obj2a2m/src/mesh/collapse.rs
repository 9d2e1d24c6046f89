//! Duplicate vertex collapser
//!
//! Within each sub-object, vertices whose positions are equal under the
//! component-wise [`VERTEX_EPSILON`] box are merged. This catches vertices
//! that share a position but entered the pool through different source
//! indices (split across non-adjacent faces or material boundaries).
//!
//! The pool is stable-sorted by (x, y, z). Each surviving entry then absorbs
//! every later entry within tolerance, scanning forward while x stays inside
//! the tolerance window, so a run of near-duplicates collapses onto its first
//! entry. The surviving pool keeps the sorted order.

use rayon::prelude::*;

use super::types::{SubObject, VERTEX_EPSILON, VertexHandle, cmp_vertex, equal_vertex};

/// `handle -> handle` alias table with path compression
#[derive(Debug, Clone)]
pub struct AliasMap {
    parent: Vec<u32>,
}

impl AliasMap {
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len as u32).collect(),
        }
    }

    /// Record `from` as an alias of `to`
    pub fn alias(&mut self, from: VertexHandle, to: VertexHandle) {
        let root = self.resolve(to);
        self.parent[from.index()] = root.0;
    }

    /// Follow aliases to the surviving handle
    pub fn resolve(&mut self, handle: VertexHandle) -> VertexHandle {
        let mut root = handle.0;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }

        let mut current = handle.0;
        while self.parent[current as usize] != root {
            let next = self.parent[current as usize];
            self.parent[current as usize] = root;
            current = next;
        }
        VertexHandle(root)
    }

    pub fn is_alias(&self, handle: VertexHandle) -> bool {
        self.parent[handle.index()] != handle.0
    }
}

/// Collapse every sub-object, preserving sub-object order
pub fn collapse(sub_objects: Vec<SubObject>) -> Vec<SubObject> {
    sub_objects
        .into_par_iter()
        .map(collapse_sub_object)
        .collect()
}

/// Collapse near-duplicate vertices of one sub-object and rewrite its faces
pub fn collapse_sub_object(mut sub: SubObject) -> SubObject {
    let count = sub.vertices.len();
    let mut order: Vec<VertexHandle> = (0..count as u32).map(VertexHandle).collect();
    // Stable: ties keep insertion order
    order.sort_by(|a, b| cmp_vertex(&sub.vertices[a.index()], &sub.vertices[b.index()]));

    let mut aliases = AliasMap::new(count);
    for (i, &survivor) in order.iter().enumerate() {
        if aliases.is_alias(survivor) {
            continue;
        }
        let s = sub.vertices[survivor.index()];
        for &candidate in &order[i + 1..] {
            let c = sub.vertices[candidate.index()];
            // Sorted by x: nothing further can be in range. NaN also stops here.
            if !(c.x < s.x + VERTEX_EPSILON) {
                break;
            }
            if !aliases.is_alias(candidate) && equal_vertex(s, c) {
                aliases.alias(candidate, survivor);
            }
        }
    }

    let mut remap = vec![VertexHandle(u32::MAX); count];
    let mut vertices = Vec::with_capacity(count);
    for &handle in &order {
        if !aliases.is_alias(handle) {
            remap[handle.index()] = VertexHandle(vertices.len() as u32);
            vertices.push(sub.vertices[handle.index()]);
        }
    }

    let removed = count - vertices.len();
    if removed > 0 {
        tracing::debug!(
            "sub-object '{}': collapsed {} duplicate vertices",
            sub.name,
            removed
        );
    }

    for face in &mut sub.faces {
        for vertex in &mut face.vertices {
            *vertex = remap[aliases.resolve(*vertex).index()];
        }
    }
    sub.vertices = vertices;
    sub
}

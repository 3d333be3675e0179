//! Non-destructive modifier stack evaluation.
//!
//! Each supported modifier maps a mesh to a new mesh. The source mesh is
//! never touched; evaluation works on owned copies.

use assetforge_spec::mesh::{Axis, MeshData, Modifier, ModifierFault};
use std::collections::HashMap;

/// Upper bound on the vertex count an evaluated mesh may reach.
pub const MAX_EVALUATED_VERTICES: usize = 10_000_000;

/// Evaluates the modifier stack of `mesh`, top to bottom.
///
/// The result has an empty modifier stack. The first modifier that cannot be
/// evaluated aborts evaluation with a [`ModifierFault`].
pub fn evaluate_modifiers(mesh: &MeshData) -> Result<MeshData, ModifierFault> {
    let mut evaluated = MeshData {
        modifiers: Vec::new(),
        ..mesh.clone()
    };

    if mesh.modifiers.is_empty() {
        return Ok(evaluated);
    }

    if has_dangling_indices(&evaluated) {
        return Err(ModifierFault {
            index: 0,
            modifier: mesh.modifiers[0].name().to_string(),
            reason: "faces reference vertices that do not exist".to_string(),
        });
    }

    for (index, modifier) in mesh.modifiers.iter().enumerate() {
        let fault = |reason: String| ModifierFault {
            index,
            modifier: modifier.name().to_string(),
            reason,
        };

        evaluated = match modifier {
            Modifier::Triangulate => triangulate(evaluated),
            Modifier::Mirror {
                axis,
                merge,
                merge_threshold,
            } => {
                if !merge_threshold.is_finite() || *merge_threshold < 0.0 {
                    return Err(fault(format!(
                        "merge threshold must be a non-negative number, got {}",
                        merge_threshold
                    )));
                }
                check_size(evaluated.vertices.len() * 2).map_err(&fault)?;
                mirror(evaluated, *axis, merge.then_some(*merge_threshold))
            }
            Modifier::Array { count, offset } => {
                if *count == 0 {
                    return Err(fault("count must be at least 1".to_string()));
                }
                if offset.iter().any(|c| !c.is_finite()) {
                    return Err(fault("offset must be finite".to_string()));
                }
                let total = evaluated.vertices.len().saturating_mul(*count as usize);
                check_size(total).map_err(&fault)?;
                array(evaluated, *count, *offset)
            }
            Modifier::Weld { distance } => {
                if !distance.is_finite() || *distance < 0.0 {
                    return Err(fault(format!(
                        "weld distance must be a non-negative number, got {}",
                        distance
                    )));
                }
                weld(evaluated, *distance)
            }
            Modifier::Other { name } => {
                return Err(fault(format!("unsupported modifier type '{}'", name)));
            }
        };
    }

    Ok(evaluated)
}

fn check_size(vertices: usize) -> Result<(), String> {
    if vertices > MAX_EVALUATED_VERTICES {
        return Err(format!(
            "result would have {} vertices, more than the {} supported",
            vertices, MAX_EVALUATED_VERTICES
        ));
    }
    Ok(())
}

fn has_dangling_indices(mesh: &MeshData) -> bool {
    let n = mesh.vertices.len();
    mesh.faces.iter().flatten().any(|&v| v as usize >= n)
}

/// Splits polygons into triangle fans. Faces with fewer than four vertices
/// are kept as they are.
fn triangulate(mut mesh: MeshData) -> MeshData {
    let mut faces = Vec::with_capacity(mesh.faces.len());
    for face in mesh.faces.drain(..) {
        if face.len() <= 3 {
            faces.push(face);
            continue;
        }
        for i in 1..face.len() - 1 {
            faces.push(vec![face[0], face[i], face[i + 1]]);
        }
    }
    mesh.faces = faces;
    mesh
}

/// Appends a mirrored copy. With `merge`, vertices within the threshold of
/// the mirror plane are shared with their mirror image.
fn mirror(mut mesh: MeshData, axis: Axis, merge: Option<f64>) -> MeshData {
    let component = axis.index();
    let original = mesh.vertices.len();
    let mut map = Vec::with_capacity(original);

    for i in 0..original {
        let position = mesh.vertices[i];
        let on_plane = merge.is_some_and(|threshold| position[component].abs() <= threshold);
        if on_plane {
            map.push(i as u32);
        } else {
            let mut mirrored = position;
            mirrored[component] = -mirrored[component];
            map.push(mesh.vertices.len() as u32);
            mesh.vertices.push(mirrored);
        }
    }

    // Reverse the loop so mirrored faces keep outward winding.
    let mirrored_faces: Vec<Vec<u32>> = mesh
        .faces
        .iter()
        .map(|face| face.iter().rev().map(|&v| map[v as usize]).collect())
        .collect();
    mesh.faces.extend(mirrored_faces);
    mesh
}

/// Repeats the mesh `count` times along `offset`.
fn array(mut mesh: MeshData, count: u32, offset: [f64; 3]) -> MeshData {
    let base_vertices = mesh.vertices.clone();
    let base_faces = mesh.faces.clone();
    let stride = base_vertices.len() as u32;

    for copy in 1..count {
        let shift = copy as f64;
        mesh.vertices.extend(base_vertices.iter().map(|p| {
            [
                p[0] + offset[0] * shift,
                p[1] + offset[1] * shift,
                p[2] + offset[2] * shift,
            ]
        }));
        mesh.faces.extend(
            base_faces
                .iter()
                .map(|face| face.iter().map(|&v| v + stride * copy).collect::<Vec<_>>()),
        );
    }
    mesh
}

/// Merges each vertex into the first earlier vertex within `distance`.
///
/// Consecutive duplicates in a face loop collapse; faces left with fewer
/// than three vertices are dropped.
fn weld(mut mesh: MeshData, distance: f64) -> MeshData {
    let mut grid: HashMap<[i64; 3], Vec<u32>> = HashMap::new();
    let mut remap = Vec::with_capacity(mesh.vertices.len());
    let mut kept: Vec<[f64; 3]> = Vec::new();

    // Float-to-int casts saturate, so far-out or tiny-distance cells clamp to
    // the i64 range; neighbour keys must saturate as well.
    let cell_of = |p: &[f64; 3]| -> [i64; 3] {
        if distance > 0.0 {
            [
                (p[0] / distance).floor() as i64,
                (p[1] / distance).floor() as i64,
                (p[2] / distance).floor() as i64,
            ]
        } else {
            // Exact matches only; -0.0 and 0.0 share a cell.
            [
                (p[0] + 0.0).to_bits() as i64,
                (p[1] + 0.0).to_bits() as i64,
                (p[2] + 0.0).to_bits() as i64,
            ]
        }
    };

    for position in &mesh.vertices {
        let cell = cell_of(position);
        let neighbours: &[i64] = if distance > 0.0 { &[-1, 0, 1] } else { &[0] };

        let mut target = None;
        'search: for dx in neighbours {
            for dy in neighbours {
                for dz in neighbours {
                    let key = [
                        cell[0].saturating_add(*dx),
                        cell[1].saturating_add(*dy),
                        cell[2].saturating_add(*dz),
                    ];
                    let Some(candidates) = grid.get(&key) else {
                        continue;
                    };
                    for &candidate in candidates {
                        if within(&kept[candidate as usize], position, distance)
                            && target.map_or(true, |t| candidate < t)
                        {
                            target = Some(candidate);
                        }
                    }
                    if target.is_some() && distance == 0.0 {
                        break 'search;
                    }
                }
            }
        }

        let index = match target {
            Some(index) => index,
            None => {
                let index = kept.len() as u32;
                kept.push(*position);
                grid.entry(cell).or_default().push(index);
                index
            }
        };
        remap.push(index);
    }

    let faces = mesh
        .faces
        .iter()
        .filter_map(|face| {
            let mut loop_: Vec<u32> = Vec::with_capacity(face.len());
            for &v in face {
                let mapped = remap[v as usize];
                if loop_.last() != Some(&mapped) {
                    loop_.push(mapped);
                }
            }
            while loop_.len() > 1 && loop_.first() == loop_.last() {
                loop_.pop();
            }
            (loop_.len() >= 3).then_some(loop_)
        })
        .collect();

    mesh.vertices = kept;
    mesh.faces = faces;
    mesh
}

fn within(a: &[f64; 3], b: &[f64; 3], distance: f64) -> bool {
    let d2 = (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2);
    d2 <= distance * distance
}

//! # Case Tables
//!
//! Immutable lookup data shared by the isosurface extractors.
//!
//! ## Marching Cubes Corner Layout
//!
//! ```text
//!       7──────6          Corners (x, y, z):
//!      /│     /│            0=(0,0,0)  1=(1,0,0)  2=(1,1,0)  3=(0,1,0)
//!     4─┼────5 │            4=(0,0,1)  5=(1,0,1)  6=(1,1,1)  7=(0,1,1)
//!     │ 3────┼─2
//!     │/     │/          +Y
//!     0──────1            │  +Z
//!                         │ /
//!                         └───+X
//! ```
//!
//! Case bit `i` is set when corner `i` is at or above the isolevel (empty).
//! Triangles in [`TRI_TABLE`] then wind counter-clockwise seen from the empty
//! side.
//!
//! ## Transvoxel Corner Layout
//!
//! Corner `i` sits at `(i & 1, (i >> 2) & 1, (i >> 1) & 1)`: bit 0 is X,
//! bit 1 is Z, bit 2 is Y. Corner 7 is the far corner `(1, 1, 1)` whose three
//! edges a cell owns. Case bit `i` is set when corner `i` is solid.
//!
//! The regular-cell tables are derived at compile time from [`TRI_TABLE`], so
//! both extractors triangulate every configuration identically, ambiguous
//! faces included.

/// Corner offsets in Marching Cubes order.
pub const CORNER_OFFSETS: [[i32; 3]; 8] = [
    [0, 0, 0],
    [1, 0, 0],
    [1, 1, 0],
    [0, 1, 0],
    [0, 0, 1],
    [1, 0, 1],
    [1, 1, 1],
    [0, 1, 1],
];

/// Corner pair joined by each Marching Cubes edge.
pub const EDGE_CONNECTIONS: [[usize; 2]; 12] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    [4, 5],
    [5, 6],
    [6, 7],
    [7, 4],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

/// Edges with a sign change, per Marching Cubes case.
pub const EDGE_TABLE: [u16; 256] = generate_edge_table();

const fn generate_edge_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut case = 0usize;

    while case < 256 {
        let mut edges = 0u16;
        let mut edge = 0;
        while edge < 12 {
            let a = (case >> EDGE_CONNECTIONS[edge][0]) & 1;
            let b = (case >> EDGE_CONNECTIONS[edge][1]) & 1;
            if a != b {
                edges |= 1 << edge;
            }
            edge += 1;
        }
        table[case] = edges;
        case += 1;
    }

    table
}

/// Triangles per Marching Cubes case as edge-index triples, `-1` terminated.
///
/// This is the classic published table. It is not re-derived here.
pub const TRI_TABLE: [[i8; 16]; 256] = [
    [-1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [0, 8, 3, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [0, 1, 9, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [1, 8, 3, 9, 8, 1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [1, 2, 10, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [0, 8, 3, 1, 2, 10, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [9, 2, 10, 0, 2, 9, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [2, 8, 3, 2, 10, 8, 10, 9, 8, -1, -1, -1, -1, -1, -1, -1],
    [3, 11, 2, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [0, 11, 2, 8, 11, 0, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [1, 9, 0, 2, 3, 11, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [1, 11, 2, 1, 9, 11, 9, 8, 11, -1, -1, -1, -1, -1, -1, -1],
    [3, 10, 1, 11, 10, 3, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [0, 10, 1, 0, 8, 10, 8, 11, 10, -1, -1, -1, -1, -1, -1, -1],
    [3, 9, 0, 3, 11, 9, 11, 10, 9, -1, -1, -1, -1, -1, -1, -1],
    [9, 8, 10, 10, 8, 11, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [4, 7, 8, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [4, 3, 0, 7, 3, 4, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [0, 1, 9, 8, 4, 7, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [4, 1, 9, 4, 7, 1, 7, 3, 1, -1, -1, -1, -1, -1, -1, -1],
    [1, 2, 10, 8, 4, 7, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [3, 4, 7, 3, 0, 4, 1, 2, 10, -1, -1, -1, -1, -1, -1, -1],
    [9, 2, 10, 9, 0, 2, 8, 4, 7, -1, -1, -1, -1, -1, -1, -1],
    [2, 10, 9, 2, 9, 7, 2, 7, 3, 7, 9, 4, -1, -1, -1, -1],
    [8, 4, 7, 3, 11, 2, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [11, 4, 7, 11, 2, 4, 2, 0, 4, -1, -1, -1, -1, -1, -1, -1],
    [9, 0, 1, 8, 4, 7, 2, 3, 11, -1, -1, -1, -1, -1, -1, -1],
    [4, 7, 11, 9, 4, 11, 9, 11, 2, 9, 2, 1, -1, -1, -1, -1],
    [3, 10, 1, 3, 11, 10, 7, 8, 4, -1, -1, -1, -1, -1, -1, -1],
    [1, 11, 10, 1, 4, 11, 1, 0, 4, 7, 11, 4, -1, -1, -1, -1],
    [4, 7, 8, 9, 0, 11, 9, 11, 10, 11, 0, 3, -1, -1, -1, -1],
    [4, 7, 11, 4, 11, 9, 9, 11, 10, -1, -1, -1, -1, -1, -1, -1],
    [9, 5, 4, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [9, 5, 4, 0, 8, 3, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [0, 5, 4, 1, 5, 0, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [8, 5, 4, 8, 3, 5, 3, 1, 5, -1, -1, -1, -1, -1, -1, -1],
    [1, 2, 10, 9, 5, 4, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [3, 0, 8, 1, 2, 10, 4, 9, 5, -1, -1, -1, -1, -1, -1, -1],
    [5, 2, 10, 5, 4, 2, 4, 0, 2, -1, -1, -1, -1, -1, -1, -1],
    [2, 10, 5, 3, 2, 5, 3, 5, 4, 3, 4, 8, -1, -1, -1, -1],
    [9, 5, 4, 2, 3, 11, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [0, 11, 2, 0, 8, 11, 4, 9, 5, -1, -1, -1, -1, -1, -1, -1],
    [0, 5, 4, 0, 1, 5, 2, 3, 11, -1, -1, -1, -1, -1, -1, -1],
    [2, 1, 5, 2, 5, 8, 2, 8, 11, 4, 8, 5, -1, -1, -1, -1],
    [10, 3, 11, 10, 1, 3, 9, 5, 4, -1, -1, -1, -1, -1, -1, -1],
    [4, 9, 5, 0, 8, 1, 8, 10, 1, 8, 11, 10, -1, -1, -1, -1],
    [5, 4, 0, 5, 0, 11, 5, 11, 10, 11, 0, 3, -1, -1, -1, -1],
    [5, 4, 8, 5, 8, 10, 10, 8, 11, -1, -1, -1, -1, -1, -1, -1],
    [9, 7, 8, 5, 7, 9, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [9, 3, 0, 9, 5, 3, 5, 7, 3, -1, -1, -1, -1, -1, -1, -1],
    [0, 7, 8, 0, 1, 7, 1, 5, 7, -1, -1, -1, -1, -1, -1, -1],
    [1, 5, 3, 3, 5, 7, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [9, 7, 8, 9, 5, 7, 10, 1, 2, -1, -1, -1, -1, -1, -1, -1],
    [10, 1, 2, 9, 5, 0, 5, 3, 0, 5, 7, 3, -1, -1, -1, -1],
    [8, 0, 2, 8, 2, 5, 8, 5, 7, 10, 5, 2, -1, -1, -1, -1],
    [2, 10, 5, 2, 5, 3, 3, 5, 7, -1, -1, -1, -1, -1, -1, -1],
    [7, 9, 5, 7, 8, 9, 3, 11, 2, -1, -1, -1, -1, -1, -1, -1],
    [9, 5, 7, 9, 7, 2, 9, 2, 0, 2, 7, 11, -1, -1, -1, -1],
    [2, 3, 11, 0, 1, 8, 1, 7, 8, 1, 5, 7, -1, -1, -1, -1],
    [11, 2, 1, 11, 1, 7, 7, 1, 5, -1, -1, -1, -1, -1, -1, -1],
    [9, 5, 8, 8, 5, 7, 10, 1, 3, 10, 3, 11, -1, -1, -1, -1],
    [5, 7, 0, 5, 0, 9, 7, 11, 0, 1, 0, 10, 11, 10, 0, -1],
    [11, 10, 0, 11, 0, 3, 10, 5, 0, 8, 0, 7, 5, 7, 0, -1],
    [11, 10, 5, 7, 11, 5, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [10, 6, 5, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [0, 8, 3, 5, 10, 6, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [9, 0, 1, 5, 10, 6, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [1, 8, 3, 1, 9, 8, 5, 10, 6, -1, -1, -1, -1, -1, -1, -1],
    [1, 6, 5, 2, 6, 1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [1, 6, 5, 1, 2, 6, 3, 0, 8, -1, -1, -1, -1, -1, -1, -1],
    [9, 6, 5, 9, 0, 6, 0, 2, 6, -1, -1, -1, -1, -1, -1, -1],
    [5, 9, 8, 5, 8, 2, 5, 2, 6, 3, 2, 8, -1, -1, -1, -1],
    [2, 3, 11, 10, 6, 5, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [11, 0, 8, 11, 2, 0, 10, 6, 5, -1, -1, -1, -1, -1, -1, -1],
    [0, 1, 9, 2, 3, 11, 5, 10, 6, -1, -1, -1, -1, -1, -1, -1],
    [5, 10, 6, 1, 9, 2, 9, 11, 2, 9, 8, 11, -1, -1, -1, -1],
    [6, 3, 11, 6, 5, 3, 5, 1, 3, -1, -1, -1, -1, -1, -1, -1],
    [0, 8, 11, 0, 11, 5, 0, 5, 1, 5, 11, 6, -1, -1, -1, -1],
    [3, 11, 6, 0, 3, 6, 0, 6, 5, 0, 5, 9, -1, -1, -1, -1],
    [6, 5, 9, 6, 9, 11, 11, 9, 8, -1, -1, -1, -1, -1, -1, -1],
    [5, 10, 6, 4, 7, 8, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [4, 3, 0, 4, 7, 3, 6, 5, 10, -1, -1, -1, -1, -1, -1, -1],
    [1, 9, 0, 5, 10, 6, 8, 4, 7, -1, -1, -1, -1, -1, -1, -1],
    [10, 6, 5, 1, 9, 7, 1, 7, 3, 7, 9, 4, -1, -1, -1, -1],
    [6, 1, 2, 6, 5, 1, 4, 7, 8, -1, -1, -1, -1, -1, -1, -1],
    [1, 2, 5, 5, 2, 6, 3, 0, 4, 3, 4, 7, -1, -1, -1, -1],
    [8, 4, 7, 9, 0, 5, 0, 6, 5, 0, 2, 6, -1, -1, -1, -1],
    [7, 3, 9, 7, 9, 4, 3, 2, 9, 5, 9, 6, 2, 6, 9, -1],
    [3, 11, 2, 7, 8, 4, 10, 6, 5, -1, -1, -1, -1, -1, -1, -1],
    [5, 10, 6, 4, 7, 2, 4, 2, 0, 2, 7, 11, -1, -1, -1, -1],
    [0, 1, 9, 4, 7, 8, 2, 3, 11, 5, 10, 6, -1, -1, -1, -1],
    [9, 2, 1, 9, 11, 2, 9, 4, 11, 7, 11, 4, 5, 10, 6, -1],
    [8, 4, 7, 3, 11, 5, 3, 5, 1, 5, 11, 6, -1, -1, -1, -1],
    [5, 1, 11, 5, 11, 6, 1, 0, 11, 7, 11, 4, 0, 4, 11, -1],
    [0, 5, 9, 0, 6, 5, 0, 3, 6, 11, 6, 3, 8, 4, 7, -1],
    [6, 5, 9, 6, 9, 11, 4, 7, 9, 7, 11, 9, -1, -1, -1, -1],
    [10, 4, 9, 6, 4, 10, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [4, 10, 6, 4, 9, 10, 0, 8, 3, -1, -1, -1, -1, -1, -1, -1],
    [10, 0, 1, 10, 6, 0, 6, 4, 0, -1, -1, -1, -1, -1, -1, -1],
    [8, 3, 1, 8, 1, 6, 8, 6, 4, 6, 1, 10, -1, -1, -1, -1],
    [1, 4, 9, 1, 2, 4, 2, 6, 4, -1, -1, -1, -1, -1, -1, -1],
    [3, 0, 8, 1, 2, 9, 2, 4, 9, 2, 6, 4, -1, -1, -1, -1],
    [0, 2, 4, 4, 2, 6, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [8, 3, 2, 8, 2, 4, 4, 2, 6, -1, -1, -1, -1, -1, -1, -1],
    [10, 4, 9, 10, 6, 4, 11, 2, 3, -1, -1, -1, -1, -1, -1, -1],
    [0, 8, 2, 2, 8, 11, 4, 9, 10, 4, 10, 6, -1, -1, -1, -1],
    [3, 11, 2, 0, 1, 6, 0, 6, 4, 6, 1, 10, -1, -1, -1, -1],
    [6, 4, 1, 6, 1, 10, 4, 8, 1, 2, 1, 11, 8, 11, 1, -1],
    [9, 6, 4, 9, 3, 6, 9, 1, 3, 11, 6, 3, -1, -1, -1, -1],
    [8, 11, 1, 8, 1, 0, 11, 6, 1, 9, 1, 4, 6, 4, 1, -1],
    [3, 11, 6, 3, 6, 0, 0, 6, 4, -1, -1, -1, -1, -1, -1, -1],
    [6, 4, 8, 11, 6, 8, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [7, 10, 6, 7, 8, 10, 8, 9, 10, -1, -1, -1, -1, -1, -1, -1],
    [0, 7, 3, 0, 10, 7, 0, 9, 10, 6, 7, 10, -1, -1, -1, -1],
    [10, 6, 7, 1, 10, 7, 1, 7, 8, 1, 8, 0, -1, -1, -1, -1],
    [10, 6, 7, 10, 7, 1, 1, 7, 3, -1, -1, -1, -1, -1, -1, -1],
    [1, 2, 6, 1, 6, 8, 1, 8, 9, 8, 6, 7, -1, -1, -1, -1],
    [2, 6, 9, 2, 9, 1, 6, 7, 9, 0, 9, 3, 7, 3, 9, -1],
    [7, 8, 0, 7, 0, 6, 6, 0, 2, -1, -1, -1, -1, -1, -1, -1],
    [7, 3, 2, 6, 7, 2, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [2, 3, 11, 10, 6, 8, 10, 8, 9, 8, 6, 7, -1, -1, -1, -1],
    [2, 0, 7, 2, 7, 11, 0, 9, 7, 6, 7, 10, 9, 10, 7, -1],
    [1, 8, 0, 1, 7, 8, 1, 10, 7, 6, 7, 10, 2, 3, 11, -1],
    [11, 2, 1, 11, 1, 7, 10, 6, 1, 6, 7, 1, -1, -1, -1, -1],
    [8, 9, 6, 8, 6, 7, 9, 1, 6, 11, 6, 3, 1, 3, 6, -1],
    [0, 9, 1, 11, 6, 7, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [7, 8, 0, 7, 0, 6, 3, 11, 0, 11, 6, 0, -1, -1, -1, -1],
    [7, 11, 6, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [7, 6, 11, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [3, 0, 8, 11, 7, 6, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [0, 1, 9, 11, 7, 6, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [8, 1, 9, 8, 3, 1, 11, 7, 6, -1, -1, -1, -1, -1, -1, -1],
    [10, 1, 2, 6, 11, 7, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [1, 2, 10, 3, 0, 8, 6, 11, 7, -1, -1, -1, -1, -1, -1, -1],
    [2, 9, 0, 2, 10, 9, 6, 11, 7, -1, -1, -1, -1, -1, -1, -1],
    [6, 11, 7, 2, 10, 3, 10, 8, 3, 10, 9, 8, -1, -1, -1, -1],
    [7, 2, 3, 6, 2, 7, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [7, 0, 8, 7, 6, 0, 6, 2, 0, -1, -1, -1, -1, -1, -1, -1],
    [2, 7, 6, 2, 3, 7, 0, 1, 9, -1, -1, -1, -1, -1, -1, -1],
    [1, 6, 2, 1, 8, 6, 1, 9, 8, 8, 7, 6, -1, -1, -1, -1],
    [10, 7, 6, 10, 1, 7, 1, 3, 7, -1, -1, -1, -1, -1, -1, -1],
    [10, 7, 6, 1, 7, 10, 1, 8, 7, 1, 0, 8, -1, -1, -1, -1],
    [0, 3, 7, 0, 7, 10, 0, 10, 9, 6, 10, 7, -1, -1, -1, -1],
    [7, 6, 10, 7, 10, 8, 8, 10, 9, -1, -1, -1, -1, -1, -1, -1],
    [6, 8, 4, 11, 8, 6, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [3, 6, 11, 3, 0, 6, 0, 4, 6, -1, -1, -1, -1, -1, -1, -1],
    [8, 6, 11, 8, 4, 6, 9, 0, 1, -1, -1, -1, -1, -1, -1, -1],
    [9, 4, 6, 9, 6, 3, 9, 3, 1, 11, 3, 6, -1, -1, -1, -1],
    [6, 8, 4, 6, 11, 8, 2, 10, 1, -1, -1, -1, -1, -1, -1, -1],
    [1, 2, 10, 3, 0, 11, 0, 6, 11, 0, 4, 6, -1, -1, -1, -1],
    [4, 11, 8, 4, 6, 11, 0, 2, 9, 2, 10, 9, -1, -1, -1, -1],
    [10, 9, 3, 10, 3, 2, 9, 4, 3, 11, 3, 6, 4, 6, 3, -1],
    [8, 2, 3, 8, 4, 2, 4, 6, 2, -1, -1, -1, -1, -1, -1, -1],
    [0, 4, 2, 4, 6, 2, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [1, 9, 0, 2, 3, 4, 2, 4, 6, 4, 3, 8, -1, -1, -1, -1],
    [1, 9, 4, 1, 4, 2, 2, 4, 6, -1, -1, -1, -1, -1, -1, -1],
    [8, 1, 3, 8, 6, 1, 8, 4, 6, 6, 10, 1, -1, -1, -1, -1],
    [10, 1, 0, 10, 0, 6, 6, 0, 4, -1, -1, -1, -1, -1, -1, -1],
    [4, 6, 3, 4, 3, 8, 6, 10, 3, 0, 3, 9, 10, 9, 3, -1],
    [10, 9, 4, 6, 10, 4, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [4, 9, 5, 7, 6, 11, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [0, 8, 3, 4, 9, 5, 11, 7, 6, -1, -1, -1, -1, -1, -1, -1],
    [5, 0, 1, 5, 4, 0, 7, 6, 11, -1, -1, -1, -1, -1, -1, -1],
    [11, 7, 6, 8, 3, 4, 3, 5, 4, 3, 1, 5, -1, -1, -1, -1],
    [9, 5, 4, 10, 1, 2, 7, 6, 11, -1, -1, -1, -1, -1, -1, -1],
    [6, 11, 7, 1, 2, 10, 0, 8, 3, 4, 9, 5, -1, -1, -1, -1],
    [7, 6, 11, 5, 4, 10, 4, 2, 10, 4, 0, 2, -1, -1, -1, -1],
    [3, 4, 8, 3, 5, 4, 3, 2, 5, 10, 5, 2, 11, 7, 6, -1],
    [7, 2, 3, 7, 6, 2, 5, 4, 9, -1, -1, -1, -1, -1, -1, -1],
    [9, 5, 4, 0, 8, 6, 0, 6, 2, 6, 8, 7, -1, -1, -1, -1],
    [3, 6, 2, 3, 7, 6, 1, 5, 0, 5, 4, 0, -1, -1, -1, -1],
    [6, 2, 8, 6, 8, 7, 2, 1, 8, 4, 8, 5, 1, 5, 8, -1],
    [9, 5, 4, 10, 1, 6, 1, 7, 6, 1, 3, 7, -1, -1, -1, -1],
    [1, 6, 10, 1, 7, 6, 1, 0, 7, 8, 7, 0, 9, 5, 4, -1],
    [4, 0, 10, 4, 10, 5, 0, 3, 10, 6, 10, 7, 3, 7, 10, -1],
    [7, 6, 10, 7, 10, 8, 5, 4, 10, 4, 8, 10, -1, -1, -1, -1],
    [6, 9, 5, 6, 11, 9, 11, 8, 9, -1, -1, -1, -1, -1, -1, -1],
    [3, 6, 11, 0, 6, 3, 0, 5, 6, 0, 9, 5, -1, -1, -1, -1],
    [0, 11, 8, 0, 5, 11, 0, 1, 5, 5, 6, 11, -1, -1, -1, -1],
    [6, 11, 3, 6, 3, 5, 5, 3, 1, -1, -1, -1, -1, -1, -1, -1],
    [1, 2, 10, 9, 5, 11, 9, 11, 8, 11, 5, 6, -1, -1, -1, -1],
    [0, 11, 3, 0, 6, 11, 0, 9, 6, 5, 6, 9, 1, 2, 10, -1],
    [11, 8, 5, 11, 5, 6, 8, 0, 5, 10, 5, 2, 0, 2, 5, -1],
    [6, 11, 3, 6, 3, 5, 2, 10, 3, 10, 5, 3, -1, -1, -1, -1],
    [5, 8, 9, 5, 2, 8, 5, 6, 2, 3, 8, 2, -1, -1, -1, -1],
    [9, 5, 6, 9, 6, 0, 0, 6, 2, -1, -1, -1, -1, -1, -1, -1],
    [1, 5, 8, 1, 8, 0, 5, 6, 8, 3, 8, 2, 6, 2, 8, -1],
    [1, 5, 6, 2, 1, 6, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [1, 3, 6, 1, 6, 10, 3, 8, 6, 5, 6, 9, 8, 9, 6, -1],
    [10, 1, 0, 10, 0, 6, 9, 5, 0, 5, 6, 0, -1, -1, -1, -1],
    [0, 3, 8, 5, 6, 10, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [10, 5, 6, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [11, 5, 10, 7, 5, 11, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [11, 5, 10, 11, 7, 5, 8, 3, 0, -1, -1, -1, -1, -1, -1, -1],
    [5, 11, 7, 5, 10, 11, 1, 9, 0, -1, -1, -1, -1, -1, -1, -1],
    [10, 7, 5, 10, 11, 7, 9, 8, 1, 8, 3, 1, -1, -1, -1, -1],
    [11, 1, 2, 11, 7, 1, 7, 5, 1, -1, -1, -1, -1, -1, -1, -1],
    [0, 8, 3, 1, 2, 7, 1, 7, 5, 7, 2, 11, -1, -1, -1, -1],
    [9, 7, 5, 9, 2, 7, 9, 0, 2, 2, 11, 7, -1, -1, -1, -1],
    [7, 5, 2, 7, 2, 11, 5, 9, 2, 3, 2, 8, 9, 8, 2, -1],
    [2, 5, 10, 2, 3, 5, 3, 7, 5, -1, -1, -1, -1, -1, -1, -1],
    [8, 2, 0, 8, 5, 2, 8, 7, 5, 10, 2, 5, -1, -1, -1, -1],
    [9, 0, 1, 5, 10, 3, 5, 3, 7, 3, 10, 2, -1, -1, -1, -1],
    [9, 8, 2, 9, 2, 1, 8, 7, 2, 10, 2, 5, 7, 5, 2, -1],
    [1, 3, 5, 3, 7, 5, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [0, 8, 7, 0, 7, 1, 1, 7, 5, -1, -1, -1, -1, -1, -1, -1],
    [9, 0, 3, 9, 3, 5, 5, 3, 7, -1, -1, -1, -1, -1, -1, -1],
    [9, 8, 7, 5, 9, 7, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [5, 8, 4, 5, 10, 8, 10, 11, 8, -1, -1, -1, -1, -1, -1, -1],
    [5, 0, 4, 5, 11, 0, 5, 10, 11, 11, 3, 0, -1, -1, -1, -1],
    [0, 1, 9, 8, 4, 10, 8, 10, 11, 10, 4, 5, -1, -1, -1, -1],
    [10, 11, 4, 10, 4, 5, 11, 3, 4, 9, 4, 1, 3, 1, 4, -1],
    [2, 5, 1, 2, 8, 5, 2, 11, 8, 4, 5, 8, -1, -1, -1, -1],
    [0, 4, 11, 0, 11, 3, 4, 5, 11, 2, 11, 1, 5, 1, 11, -1],
    [0, 2, 5, 0, 5, 9, 2, 11, 5, 4, 5, 8, 11, 8, 5, -1],
    [9, 4, 5, 2, 11, 3, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [2, 5, 10, 3, 5, 2, 3, 4, 5, 3, 8, 4, -1, -1, -1, -1],
    [5, 10, 2, 5, 2, 4, 4, 2, 0, -1, -1, -1, -1, -1, -1, -1],
    [3, 10, 2, 3, 5, 10, 3, 8, 5, 4, 5, 8, 0, 1, 9, -1],
    [5, 10, 2, 5, 2, 4, 1, 9, 2, 9, 4, 2, -1, -1, -1, -1],
    [8, 4, 5, 8, 5, 3, 3, 5, 1, -1, -1, -1, -1, -1, -1, -1],
    [0, 4, 5, 1, 0, 5, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [8, 4, 5, 8, 5, 3, 9, 0, 5, 0, 3, 5, -1, -1, -1, -1],
    [9, 4, 5, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [4, 11, 7, 4, 9, 11, 9, 10, 11, -1, -1, -1, -1, -1, -1, -1],
    [0, 8, 3, 4, 9, 7, 9, 11, 7, 9, 10, 11, -1, -1, -1, -1],
    [1, 10, 11, 1, 11, 4, 1, 4, 0, 7, 4, 11, -1, -1, -1, -1],
    [3, 1, 4, 3, 4, 8, 1, 10, 4, 7, 4, 11, 10, 11, 4, -1],
    [4, 11, 7, 9, 11, 4, 9, 2, 11, 9, 1, 2, -1, -1, -1, -1],
    [9, 7, 4, 9, 11, 7, 9, 1, 11, 2, 11, 1, 0, 8, 3, -1],
    [11, 7, 4, 11, 4, 2, 2, 4, 0, -1, -1, -1, -1, -1, -1, -1],
    [11, 7, 4, 11, 4, 2, 8, 3, 4, 3, 2, 4, -1, -1, -1, -1],
    [2, 9, 10, 2, 7, 9, 2, 3, 7, 7, 4, 9, -1, -1, -1, -1],
    [9, 10, 7, 9, 7, 4, 10, 2, 7, 8, 7, 0, 2, 0, 7, -1],
    [3, 7, 10, 3, 10, 2, 7, 4, 10, 1, 10, 0, 4, 0, 10, -1],
    [1, 10, 2, 8, 7, 4, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [4, 9, 1, 4, 1, 7, 7, 1, 3, -1, -1, -1, -1, -1, -1, -1],
    [4, 9, 1, 4, 1, 7, 0, 8, 1, 8, 7, 1, -1, -1, -1, -1],
    [4, 0, 3, 7, 4, 3, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [4, 8, 7, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [9, 10, 8, 10, 11, 8, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [3, 0, 9, 3, 9, 11, 11, 9, 10, -1, -1, -1, -1, -1, -1, -1],
    [0, 1, 10, 0, 10, 8, 8, 10, 11, -1, -1, -1, -1, -1, -1, -1],
    [3, 1, 10, 11, 3, 10, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [1, 2, 11, 1, 11, 9, 9, 11, 8, -1, -1, -1, -1, -1, -1, -1],
    [3, 0, 9, 3, 9, 11, 1, 2, 9, 2, 11, 9, -1, -1, -1, -1],
    [0, 2, 11, 8, 0, 11, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [3, 2, 11, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [2, 3, 8, 2, 8, 10, 10, 8, 9, -1, -1, -1, -1, -1, -1, -1],
    [9, 10, 2, 0, 9, 2, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [2, 3, 8, 2, 8, 10, 0, 1, 8, 1, 10, 8, -1, -1, -1, -1],
    [1, 10, 2, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [1, 3, 8, 9, 1, 8, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [0, 9, 1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [0, 3, 8, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [-1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
];

/// Number of triangles Marching Cubes emits for a case.
#[must_use]
pub const fn triangle_count(case: usize) -> usize {
    let row = TRI_TABLE[case];
    let mut n = 0;
    while n < 16 && row[n] != -1 {
        n += 1;
    }
    n / 3
}

/// Uniform-cell test: XOR the case with the sign of corner 7.
///
/// Reinterpreting the case as `i8` and shifting right by 7 smears bit 7 into
/// `0x00` or `0xFF`. The XOR is zero exactly when every corner matches
/// corner 7, i.e. for cases 0 and 255.
#[inline]
#[must_use]
pub const fn is_uniform_case(case: u8) -> bool {
    case ^ ((case as i8) >> 7) as u8 == 0
}

// =============================================================================
// TRANSVOXEL REGULAR CELLS
// =============================================================================

/// Corner offsets in Transvoxel order.
pub const TRANSVOXEL_CORNERS: [[i32; 3]; 8] = [
    [0, 0, 0],
    [1, 0, 0],
    [0, 0, 1],
    [1, 0, 1],
    [0, 1, 0],
    [1, 1, 0],
    [0, 1, 1],
    [1, 1, 1],
];

/// Transvoxel corner index of each Marching Cubes corner.
const MC_TO_TRANSVOXEL: [usize; 8] = [0, 1, 5, 4, 2, 3, 7, 6];

/// Direction bit: owning neighbour lies at -X.
pub const REUSE_NEG_X: u8 = 1;
/// Direction bit: owning neighbour lies at -Z.
pub const REUSE_NEG_Z: u8 = 2;
/// Direction bit: owning neighbour lies at -Y (previous slice).
pub const REUSE_NEG_Y: u8 = 4;
/// Direction value: this cell owns the vertex and caches it for later cells.
pub const REUSE_OWNED: u8 = 8;

/// Triangulation of one regular-cell class.
///
/// `geometry` packs the vertex count in the high nibble and the triangle
/// count in the low nibble. Triangles are stored in reverse winding; emit
/// `vertex_index[3 * t + (2 - i)]` for `i` in `0..3`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegularCellData {
    geometry: u8,
    vertex_index: [u8; 15],
}

impl RegularCellData {
    const EMPTY: Self = Self {
        geometry: 0,
        vertex_index: [0; 15],
    };

    /// Number of distinct edge vertices.
    #[inline]
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        (self.geometry >> 4) as usize
    }

    /// Number of triangles.
    #[inline]
    #[must_use]
    pub const fn triangle_count(&self) -> usize {
        (self.geometry & 0x0F) as usize
    }

    /// Local vertex indices, three per triangle, in stored (reversed) order.
    #[inline]
    #[must_use]
    pub fn indices(&self) -> &[u8] {
        &self.vertex_index[..self.triangle_count() * 3]
    }

    const fn same_as(&self, other: &Self) -> bool {
        if self.geometry != other.geometry {
            return false;
        }
        let mut i = 0;
        while i < 15 {
            if self.vertex_index[i] != other.vertex_index[i] {
                return false;
            }
            i += 1;
        }
        true
    }
}

/// Decoded vertex descriptor from [`REGULAR_VERTEX_DATA`].
///
/// ```text
/// bits 0-3    high corner (the edge endpoint with the larger index)
/// bits 4-7    low corner
/// bits 8-11   reuse slot: 1 = X edge, 2 = Z edge, 3 = Y edge
/// bits 12-15  reuse direction: REUSE_NEG_* bits, or REUSE_OWNED
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexCode(pub u16);

impl VertexCode {
    /// Corner at the low end of the edge.
    #[inline]
    #[must_use]
    pub const fn low_corner(self) -> usize {
        ((self.0 >> 4) & 0x0F) as usize
    }

    /// Corner at the high end of the edge.
    #[inline]
    #[must_use]
    pub const fn high_corner(self) -> usize {
        (self.0 & 0x0F) as usize
    }

    /// Cache slot shared by every cell touching this edge.
    #[inline]
    #[must_use]
    pub const fn slot(self) -> usize {
        ((self.0 >> 8) & 0x0F) as usize
    }

    /// Which neighbour owns the vertex.
    #[inline]
    #[must_use]
    pub const fn direction(self) -> u8 {
        (self.0 >> 12) as u8
    }
}

const fn vertex_code(low: usize, high: usize) -> u16 {
    let axis = low ^ high;
    let slot = match axis {
        1 => 1,
        2 => 2,
        _ => 3,
    };
    // For each axis across the edge, a zero coordinate means the edge is the
    // far edge of the neighbour on that side.
    let mut direction = 0;
    let mut bit = 1;
    while bit < 8 {
        if bit != axis && low & bit == 0 {
            direction |= bit;
        }
        bit <<= 1;
    }
    if direction == 0 {
        direction = REUSE_OWNED as usize;
    }
    ((direction << 12) | (slot << 8) | (low << 4) | high) as u16
}

/// Marching Cubes case for a Transvoxel case. Transvoxel marks solid corners,
/// Marching Cubes marks empty ones, and the corner numbering differs.
const fn mc_case(case: usize) -> usize {
    let mut mc = 0;
    let mut corner = 0;
    while corner < 8 {
        if (case >> MC_TO_TRANSVOXEL[corner]) & 1 == 0 {
            mc |= 1 << corner;
        }
        corner += 1;
    }
    mc
}

const fn build_case(case: usize) -> (RegularCellData, [u16; 12]) {
    let row = TRI_TABLE[mc_case(case)];
    let mut edge_vertex = [u8::MAX; 12];
    let mut codes = [0u16; 12];
    let mut cell = RegularCellData::EMPTY;
    let mut vertices = 0usize;
    let mut triangles = 0usize;

    let mut i = 0;
    while i < 15 && row[i] != -1 {
        let mut local = [0u8; 3];
        let mut k = 0;
        while k < 3 {
            let edge = row[i + k] as usize;
            if edge_vertex[edge] == u8::MAX {
                let a = MC_TO_TRANSVOXEL[EDGE_CONNECTIONS[edge][0]];
                let b = MC_TO_TRANSVOXEL[EDGE_CONNECTIONS[edge][1]];
                let (low, high) = if a < b { (a, b) } else { (b, a) };
                codes[vertices] = vertex_code(low, high);
                edge_vertex[edge] = vertices as u8;
                vertices += 1;
            }
            local[k] = edge_vertex[edge];
            k += 1;
        }
        cell.vertex_index[i] = local[2];
        cell.vertex_index[i + 1] = local[1];
        cell.vertex_index[i + 2] = local[0];
        triangles += 1;
        i += 3;
    }

    cell.geometry = ((vertices << 4) | triangles) as u8;
    (cell, codes)
}

struct RegularTables {
    class: [u8; 256],
    data: [RegularCellData; 256],
    class_count: usize,
    vertices: [[u16; 12]; 256],
}

const fn fingerprint(cell: &RegularCellData) -> u32 {
    let mut hash = 0x811c_9dc5u32 ^ cell.geometry as u32;
    hash = hash.wrapping_mul(0x0100_0193);
    let mut i = 0;
    while i < 15 {
        hash ^= cell.vertex_index[i] as u32;
        hash = hash.wrapping_mul(0x0100_0193);
        i += 1;
    }
    hash
}

const fn generate_regular_tables() -> RegularTables {
    let mut tables = RegularTables {
        class: [0; 256],
        data: [RegularCellData::EMPTY; 256],
        class_count: 0,
        vertices: [[0; 12]; 256],
    };
    let mut prints = [0u32; 256];

    let mut case = 0;
    while case < 256 {
        let (cell, codes) = build_case(case);
        tables.vertices[case] = codes;

        let print = fingerprint(&cell);
        let mut class = 0;
        while class < tables.class_count {
            if prints[class] == print && tables.data[class].same_as(&cell) {
                break;
            }
            class += 1;
        }
        if class == tables.class_count {
            tables.data[class] = cell;
            prints[class] = print;
            tables.class_count += 1;
        }
        tables.class[case] = class as u8;
        case += 1;
    }

    tables
}

const REGULAR: RegularTables = generate_regular_tables();

/// Class of each Transvoxel case: cases sharing a triangulation share a class.
pub const REGULAR_CELL_CLASS: [u8; 256] = REGULAR.class;

/// Triangulation per class. Entries at or past [`REGULAR_CLASS_COUNT`] are empty.
pub static REGULAR_CELL_DATA: [RegularCellData; 256] = REGULAR.data;

/// Number of distinct regular-cell classes.
pub const REGULAR_CLASS_COUNT: usize = REGULAR.class_count;

/// Packed [`VertexCode`]s per case, in local vertex order.
pub const REGULAR_VERTEX_DATA: [[u16; 12]; 256] = REGULAR.vertices;

/// Triangulation for a Transvoxel case.
#[inline]
#[must_use]
pub fn regular_cell(case: u8) -> &'static RegularCellData {
    &REGULAR_CELL_DATA[REGULAR_CELL_CLASS[case as usize] as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_table_matches_published_entries() {
        assert_eq!(EDGE_TABLE[0], 0);
        assert_eq!(EDGE_TABLE[255], 0);
        assert_eq!(EDGE_TABLE[1], 0x109);
        assert_eq!(EDGE_TABLE[16], 0x190);
        assert_eq!(EDGE_TABLE[0x0F], 0xF00);
    }

    #[test]
    fn test_tri_table_uses_only_crossed_edges() {
        for case in 0..256 {
            let used = TRI_TABLE[case]
                .iter()
                .take_while(|&&e| e != -1)
                .fold(0u16, |mask, &e| mask | 1 << e);
            assert_eq!(used, EDGE_TABLE[case], "case {case}");
            assert_eq!(TRI_TABLE[case].iter().take_while(|&&e| e != -1).count() % 3, 0);
        }
    }

    #[test]
    fn test_uniform_cases() {
        for case in 0..=255u8 {
            assert_eq!(is_uniform_case(case), case == 0 || case == 255, "case {case}");
        }
        assert_eq!(triangle_count(0), 0);
        assert_eq!(triangle_count(255), 0);
        assert_eq!(triangle_count(1), 1);
    }

    #[test]
    fn test_corner_layouts_agree() {
        for (mc, &tv) in MC_TO_TRANSVOXEL.iter().enumerate() {
            assert_eq!(CORNER_OFFSETS[mc], TRANSVOXEL_CORNERS[tv]);
            let [x, y, z] = TRANSVOXEL_CORNERS[tv];
            assert_eq!(tv as i32, x | z << 1 | y << 2);
        }
    }

    #[test]
    fn test_regular_cells_match_marching_cubes() {
        for case in 0..=255u8 {
            let cell = regular_cell(case);
            assert_eq!(cell.triangle_count(), triangle_count(mc_case(case as usize)));
            assert_eq!(cell.vertex_count(), EDGE_TABLE[mc_case(case as usize)].count_ones() as usize);
            assert_eq!(*cell, build_case(case as usize).0, "class data for case {case}");
        }
    }

    #[test]
    fn test_case_indices_stay_in_range() {
        for case in 0..=255u8 {
            let cell = regular_cell(case);
            assert_eq!(cell.indices().len(), cell.triangle_count() * 3, "case {case}");
            assert!(
                cell.indices().iter().all(|&i| (i as usize) < cell.vertex_count()),
                "case {case} indexes past its {} vertices",
                cell.vertex_count()
            );
        }
    }

    #[test]
    fn test_classes_are_distinct() {
        assert!(REGULAR_CLASS_COUNT > 1 && REGULAR_CLASS_COUNT < 256);
        assert_eq!(REGULAR_CELL_CLASS[0], 0);
        assert_eq!(REGULAR_CELL_CLASS[255], 0);
        assert_eq!(REGULAR_CELL_DATA[0].triangle_count(), 0);
        for a in 0..REGULAR_CLASS_COUNT {
            for b in a + 1..REGULAR_CLASS_COUNT {
                assert_ne!(REGULAR_CELL_DATA[a], REGULAR_CELL_DATA[b]);
            }
        }
    }

    #[test]
    fn test_vertex_codes_name_real_edges() {
        for case in 0..256 {
            let cell = regular_cell(case as u8);
            for &raw in &REGULAR_VERTEX_DATA[case][..cell.vertex_count()] {
                let code = VertexCode(raw);
                let (low, high) = (code.low_corner(), code.high_corner());
                assert!(low < high);
                assert_eq!((low ^ high).count_ones(), 1, "not an edge: {low}-{high}");
                // Exactly one end of the edge is solid.
                assert_ne!((case >> low) & 1, (case >> high) & 1);
                assert!((1..=3).contains(&code.slot()));
                let dir = code.direction();
                assert!(dir == REUSE_OWNED || (1..8).contains(&dir));
                assert_eq!(dir == REUSE_OWNED, high == 7);
            }
        }
    }
}

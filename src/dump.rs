use crate::region::RegionTree;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

/// one row of a persisted region dump: parent id, depth, the region's
/// local result/error, the axis it was split on, and the scale exponent
/// observed while evaluating it. Field order and types mirror the
/// reference dump's `"iiffii"` template record — the two `f` codes are
/// 8-byte C `double`s, so `local_result`/`local_error` are `f64` here,
/// not `f32`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DumpRow {
    pub parent_id: i32,
    pub depth: i32,
    pub local_result: f64,
    pub local_error: f64,
    pub split_axis: i32,
    pub scale: i32,
}

/// writes every region in `tree` as a flat stream of fixed-size records,
/// parent before children, root's `parent_id` set to -1.
pub fn write_regions<W: Write>(tree: &RegionTree, mut out: W) -> io::Result<()> {
    let graph = tree.graph();
    for index in graph.node_indices() {
        let region = tree.get(index);
        let data = region.data();
        let parent_id = region.parent().map_or(-1, |p| p.index().index() as i32);
        let row = DumpRow {
            parent_id,
            depth: data.depth as i32,
            local_result: data.local_result,
            local_error: data.local_error,
            split_axis: data.split_axis as i32,
            scale: data.scale,
        };
        write_row(&mut out, &row)?;
    }
    Ok(())
}

fn write_row<W: Write>(out: &mut W, row: &DumpRow) -> io::Result<()> {
    out.write_i32::<LittleEndian>(row.parent_id)?;
    out.write_i32::<LittleEndian>(row.depth)?;
    out.write_f64::<LittleEndian>(row.local_result)?;
    out.write_f64::<LittleEndian>(row.local_error)?;
    out.write_i32::<LittleEndian>(row.split_axis)?;
    out.write_i32::<LittleEndian>(row.scale)
}

/// reads back a stream written by [`write_regions`] into a flat `Vec`,
/// one entry per node in the order written (index in the vec equals the
/// node's id in the dump, so `parent_id` indexes directly into it).
pub fn read_regions<R: Read>(mut input: R) -> io::Result<Vec<DumpRow>> {
    let mut rows = Vec::new();
    loop {
        let parent_id = match input.read_i32::<LittleEndian>() {
            Ok(v) => v,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e),
        };
        let depth = input.read_i32::<LittleEndian>()?;
        let local_result = input.read_f64::<LittleEndian>()?;
        let local_error = input.read_f64::<LittleEndian>()?;
        let split_axis = input.read_i32::<LittleEndian>()?;
        let scale = input.read_i32::<LittleEndian>()?;
        rows.push(DumpRow {
            parent_id,
            depth,
            local_result,
            local_error,
            split_axis,
            scale,
        });
    }
    Ok(rows)
}

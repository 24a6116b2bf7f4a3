//! Nintendo AST ("STRM") streams
//!
//! A 0x40-byte big endian header followed by "BLCK" blocks, each holding
//! one chunk per channel.

use crate::error::{StreamError, StreamResult};
use crate::io::{Resource, ResourceExt};
use crate::layout::block_update;
use crate::stream::{BlockedKind, CodingType, LayoutType, MetaType, StreamHandle};

const AST_ID: &[u8] = b"STRM";
const AST_HEADER_SIZE: u64 = 0x40;

pub fn probe_ast(res: &mut dyn Resource) -> StreamResult<StreamHandle> {
    if !res.has_magic(0, AST_ID) {
        return Err(StreamError::RejectedFormat("not an AST file".to_string()));
    }
    if res.read_u16be_at(0x0a)? != 16 {
        return Err(StreamError::RejectedFormat("AST sample width is not 16".to_string()));
    }
    if res.read_u32be_at(0x04)? as u64 + AST_HEADER_SIZE != res.size() {
        return Err(StreamError::RejectedFormat("AST size mismatch".to_string()));
    }

    let coding = match res.read_u16be_at(0x08)? {
        0 => CodingType::NgcAfc,
        1 => CodingType::Pcm16Be,
        other => {
            return Err(StreamError::RejectedFormat(format!(
                "unknown AST codec {}",
                other
            )))
        }
    };
    let channels = res.read_u16be_at(0x0c)? as usize;
    let loop_flag = res.read_u16be_at(0x0e)? != 0;

    let mut h = StreamHandle::allocate(channels, loop_flag)?;
    h.desc.sample_rate = res.read_u32be_at(0x10)?.min(i32::MAX as u32) as i32;
    h.desc.num_samples = res.read_u32be_at(0x14)?.min(i32::MAX as u32) as i32;
    h.desc.loop_start_sample = res.read_u32be_at(0x18)?.min(i32::MAX as u32) as i32;
    h.desc.loop_end_sample = res.read_u32be_at(0x1c)?.min(i32::MAX as u32) as i32;
    h.desc.coding = coding;
    h.desc.layout = LayoutType::Blocked(BlockedKind::Ast);
    h.desc.meta = MetaType::Ast;

    h.open_stream(res, AST_HEADER_SIZE)?;
    block_update(&mut h, BlockedKind::Ast, AST_HEADER_SIZE);
    Ok(h)
}

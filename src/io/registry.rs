//! Per-handle resource ownership
//!
//! Channel cursors refer to resources by [`ResourceId`]. Several cursors may
//! share one id; the registry owns the resource and closes it exactly once.

use super::resource::Resource;

/// Index of a resource inside a [`ResourceRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceId(u32);

impl ResourceId {
    /// Shift this id by the base returned from [`ResourceRegistry::absorb`].
    pub fn rebase(self, base: u32) -> Self {
        ResourceId(self.0 + base)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Owns every resource opened for one stream handle.
#[derive(Default)]
pub struct ResourceRegistry {
    slots: Vec<Option<Box<dyn Resource>>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a resource.
    pub fn insert(&mut self, resource: Box<dyn Resource>) -> ResourceId {
        self.slots.push(Some(resource));
        ResourceId((self.slots.len() - 1) as u32)
    }

    /// Number of registered resources still open.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get_mut(&mut self, id: ResourceId) -> Option<&mut (dyn Resource + 'static)> {
        self.slots.get_mut(id.index())?.as_deref_mut()
    }

    pub fn name(&self, id: ResourceId) -> Option<&str> {
        self.slots.get(id.index())?.as_deref().map(|r| r.name())
    }

    pub fn size(&self, id: ResourceId) -> u64 {
        self.slots
            .get(id.index())
            .and_then(|s| s.as_deref())
            .map(|r| r.size())
            .unwrap_or(0)
    }

    /// Read into `buf`, zero-filling whatever lies past the end of the resource.
    pub fn read_at(&mut self, id: Option<ResourceId>, offset: u64, buf: &mut [u8]) -> usize {
        let n = match id.and_then(|id| self.get_mut(id)) {
            Some(res) => res.read(offset, buf),
            None => 0,
        };
        buf[n..].fill(0);
        n
    }

    pub fn read_u8(&mut self, id: Option<ResourceId>, offset: u64) -> u8 {
        let mut b = [0u8; 1];
        self.read_at(id, offset, &mut b);
        b[0]
    }

    pub fn read_i16le(&mut self, id: Option<ResourceId>, offset: u64) -> i16 {
        let mut b = [0u8; 2];
        self.read_at(id, offset, &mut b);
        i16::from_le_bytes(b)
    }

    pub fn read_i16be(&mut self, id: Option<ResourceId>, offset: u64) -> i16 {
        let mut b = [0u8; 2];
        self.read_at(id, offset, &mut b);
        i16::from_be_bytes(b)
    }

    pub fn read_u32le(&mut self, id: Option<ResourceId>, offset: u64) -> u32 {
        let mut b = [0u8; 4];
        self.read_at(id, offset, &mut b);
        u32::from_le_bytes(b)
    }

    pub fn read_u32be(&mut self, id: Option<ResourceId>, offset: u64) -> u32 {
        let mut b = [0u8; 4];
        self.read_at(id, offset, &mut b);
        u32::from_be_bytes(b)
    }

    /// Move every resource of `other` into this registry.
    ///
    /// Returns the base to [`ResourceId::rebase`] ids that referred to `other`.
    pub fn absorb(&mut self, other: &mut ResourceRegistry) -> u32 {
        let base = self.slots.len() as u32;
        self.slots.append(&mut other.slots);
        base
    }

    /// Close every resource once and forget it.
    pub fn close_all(&mut self) {
        for slot in self.slots.iter_mut() {
            if let Some(mut res) = slot.take() {
                log::trace!("closing {}", res.name());
                res.close();
            }
        }
        self.slots.clear();
    }
}

impl Drop for ResourceRegistry {
    fn drop(&mut self) {
        self.close_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryFs;

    #[test]
    fn test_read_zero_fills_past_end() {
        let fs = MemoryFs::new();
        fs.insert("a", vec![0x34, 0x12]);
        let mut reg = ResourceRegistry::new();
        let id = reg.insert(Box::new(fs.open("a").unwrap()));

        assert_eq!(reg.read_i16le(Some(id), 0), 0x1234);
        assert_eq!(reg.read_i16be(Some(id), 0), 0x3412);
        assert_eq!(reg.read_u32le(Some(id), 0), 0x1234);
        assert_eq!(reg.read_u8(None, 0), 0);
        assert_eq!(reg.name(id), Some("a"));
        assert_eq!(reg.size(id), 2);
    }

    #[test]
    fn test_absorb_and_close_once() {
        let fs = MemoryFs::new();
        fs.insert("a", vec![1]);
        fs.insert("b", vec![2]);

        let mut reg = ResourceRegistry::new();
        reg.insert(Box::new(fs.open("a").unwrap()));
        let mut other = ResourceRegistry::new();
        let b = other.insert(Box::new(fs.open("b").unwrap()));

        let base = reg.absorb(&mut other);
        let b = b.rebase(base);
        assert_eq!(reg.read_u8(Some(b), 0), 2);
        assert_eq!(reg.len(), 2);
        assert!(other.is_empty());

        drop(other);
        assert_eq!(fs.close_count("b"), 0);

        reg.close_all();
        drop(reg);
        assert_eq!(fs.close_count("a"), 1);
        assert_eq!(fs.close_count("b"), 1);
    }
}

/// New capacity when `needed` bytes no longer fit, `None` otherwise.
fn grown_capacity(current: u64, needed: u64) -> Option<u64> {
    (needed > current).then(|| needed.next_power_of_two())
}

/// Vertex buffer that grows (power of two) when the data outgrows it.
pub(crate) struct DynamicBuffer {
    label: &'static str,
    buffer: wgpu::Buffer,
    capacity: u64,
    len: u32,
}

impl DynamicBuffer {
    pub(crate) fn new(device: &wgpu::Device, label: &'static str, initial_bytes: u64) -> Self {
        let capacity = initial_bytes.max(256);
        Self {
            label,
            buffer: Self::allocate(device, label, capacity),
            capacity,
            len: 0,
        }
    }

    fn allocate(device: &wgpu::Device, label: &str, size: u64) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Replace the contents with `items`, reallocating if needed.
    pub(crate) fn write<T: bytemuck::Pod>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        items: &[T],
    ) {
        self.len = items.len() as u32;
        if items.is_empty() {
            return;
        }
        let bytes: &[u8] = bytemuck::cast_slice(items);
        if let Some(capacity) = grown_capacity(self.capacity, bytes.len() as u64) {
            log::debug!(
                "[render] {} grow {} -> {} bytes",
                self.label,
                self.capacity,
                capacity
            );
            self.buffer.destroy();
            self.buffer = Self::allocate(device, self.label, capacity);
            self.capacity = capacity;
        }
        queue.write_buffer(&self.buffer, 0, bytes);
    }

    #[inline]
    pub(crate) fn len(&self) -> u32 {
        self.len
    }

    #[inline]
    pub(crate) fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..)
    }

    pub(crate) fn destroy(&self) {
        self.buffer.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_that_fits_keeps_the_buffer() {
        assert_eq!(grown_capacity(256, 0), None);
        assert_eq!(grown_capacity(256, 200), None);
        assert_eq!(grown_capacity(256, 256), None);
    }

    #[test]
    fn overflow_grows_to_next_power_of_two() {
        assert_eq!(grown_capacity(256, 257), Some(512));
        assert_eq!(grown_capacity(256, 1024), Some(1024));
        // 200 line segments of two 12-byte vertices
        assert_eq!(grown_capacity(512, 4800), Some(8192));
    }
}

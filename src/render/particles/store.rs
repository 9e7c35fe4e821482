//! 双缓冲（ping-pong）粒子存储
//!
//! ```text
//!   frame n:    read = A ──simulate──► write = B ──render──► swap
//!   frame n+1:  read = B ──simulate──► write = A ──render──► swap
//! ```
//!
//! 角色只由一个索引决定，`swap()` 翻转索引，从不复制数据。

use crate::render::particles::particle::Particle;

/// 两个同形状的槽位加一个角色标记
///
/// `read()` 与 `write()` 永远指向不同的槽位。
#[derive(Debug, Clone)]
pub struct PingPong<T> {
    slots: [T; 2],
    read: usize,
}

impl<T> PingPong<T> {
    /// `first` 作为初始读缓冲
    pub fn new(first: T, second: T) -> Self {
        Self {
            slots: [first, second],
            read: 0,
        }
    }

    /// 当前读缓冲的槽位编号（0 或 1）
    #[inline]
    pub fn read_index(&self) -> usize {
        self.read
    }

    /// 当前写缓冲的槽位编号（0 或 1）
    #[inline]
    pub fn write_index(&self) -> usize {
        self.read ^ 1
    }

    pub fn read(&self) -> &T {
        &self.slots[self.read_index()]
    }

    pub fn write(&self) -> &T {
        &self.slots[self.write_index()]
    }

    /// 同时借出读缓冲（只读）与写缓冲（可写）
    pub fn split(&mut self) -> (&T, &mut T) {
        let [first, second] = &mut self.slots;
        if self.read == 0 {
            (&*first, second)
        } else {
            (&*second, first)
        }
    }

    /// 帧结束后交换读写角色
    pub fn swap(&mut self) {
        self.read ^= 1;
    }

    /// 按槽位编号访问，与角色无关
    pub fn slot(&self, index: usize) -> &T {
        &self.slots[index]
    }
}

/// CPU 端粒子存储：两代粒子
#[derive(Debug, Clone)]
pub struct ParticleStore {
    generations: PingPong<Vec<Particle>>,
}

impl ParticleStore {
    /// 两代都用同一份初始粒子填充，任意一代都可以作为第一帧的读缓冲
    pub fn new(initial: Vec<Particle>) -> Self {
        let copy = initial.clone();
        Self {
            generations: PingPong::new(initial, copy),
        }
    }

    pub fn len(&self) -> usize {
        self.generations.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn read(&self) -> &[Particle] {
        self.generations.read()
    }

    pub fn write(&self) -> &[Particle] {
        self.generations.write()
    }

    /// 模拟阶段的借用：读一代、写另一代
    pub fn split(&mut self) -> (&[Particle], &mut [Particle]) {
        let (read, write) = self.generations.split();
        (read.as_slice(), write.as_mut_slice())
    }

    pub fn swap(&mut self) {
        self.generations.swap();
    }

    pub fn read_index(&self) -> usize {
        self.generations.read_index()
    }
}

//! 预计算随机场
//!
//! 启动时生成一次的二维随机值对表，重生时按粒子索引查表，
//! 避免在并行路径上生成随机数。同一个索引总是映射到同一个单元。

use rand::Rng;

/// 二维随机值对网格，每个分量都在 `[0, 1)` 内
#[derive(Debug, Clone, PartialEq)]
pub struct RandomField {
    width: u32,
    height: u32,
    cells: Vec<[f32; 2]>,
}

impl RandomField {
    /// 用给定随机源生成 `width × height` 的随机场
    pub fn generate<R: Rng + ?Sized>(width: u32, height: u32, rng: &mut R) -> Self {
        let len = width as usize * height as usize;
        let cells = (0..len).map(|_| [rng.gen::<f32>(), rng.gen::<f32>()]).collect();
        Self {
            width,
            height,
            cells,
        }
    }

    /// 用现成的数据构造（行优先）
    pub fn from_cells(width: u32, height: u32, cells: Vec<[f32; 2]>) -> Option<Self> {
        if width == 0 || height == 0 || cells.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// 粒子索引到网格坐标：`(i mod W, i div W)`
    ///
    /// 粒子数超过 `W × H` 时行号对 `H` 取模，与着色器中的寻址一致。
    #[inline]
    pub fn coord_for(&self, index: u32) -> (u32, u32) {
        (index % self.width, (index / self.width) % self.height)
    }

    #[inline]
    pub fn cell(&self, x: u32, y: u32) -> [f32; 2] {
        self.cells[y as usize * self.width as usize + x as usize]
    }

    #[inline]
    pub fn cell_for(&self, index: u32) -> [f32; 2] {
        let (x, y) = self.coord_for(index);
        self.cell(x, y)
    }

    /// 行优先的原始数据，用于上传 `Rg32Float` 纹理
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.cells)
    }
}

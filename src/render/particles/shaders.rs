//! 粒子着色器源码
//!
//! 更新着色器与 [`super::kernel::simulate_particle`] 使用同一套公式。

/// 模拟阶段计算着色器的工作组大小
pub const WORKGROUP_SIZE: u32 = 64;

/// 着色器阶段名称，编译失败时写进日志
pub const UPDATE_STAGE: &str = "particle-update";
pub const RENDER_STAGE: &str = "particle-render";

/// 模拟阶段：读一代、写另一代
pub const UPDATE_SHADER: &str = r#"
struct Particle {
    position: vec2<f32>,
    velocity: vec2<f32>,
    age: f32,
    life: f32,
};

struct SimParams {
    gravity: vec2<f32>,
    origin: vec2<f32>,
    viewport: vec2<f32>,
    theta: vec2<f32>,
    speed: vec2<f32>,
    time_delta: f32,
    total_time: f32,
    particle_count: u32,
    field_width: u32,
    field_height: u32,
    compound_position: u32,
};

@group(0) @binding(0) var<uniform> params: SimParams;
@group(0) @binding(1) var<storage, read> particles_in: array<Particle>;
@group(0) @binding(2) var<storage, read_write> particles_out: array<Particle>;
@group(0) @binding(3) var rg_noise: texture_2d<f32>;

fn sample_range(range: vec2<f32>, t: f32) -> f32 {
    let value = range.x + t * (range.y - range.x);
    return min(max(value, min(range.x, range.y)), max(range.x, range.y));
}

@compute @workgroup_size(64)
fn main(@builtin(global_invocation_id) id: vec3<u32>) {
    let i = id.x;
    if (i >= params.particle_count) {
        return;
    }

    let p = particles_in[i];
    var updated: Particle;

    if (p.age >= p.life) {
        let coord = vec2<i32>(
            i32(i % params.field_width),
            i32((i / params.field_width) % params.field_height)
        );
        let noise = textureLoad(rg_noise, coord, 0).rg;
        let theta = sample_range(params.theta, noise.r);
        let speed = sample_range(params.speed, noise.g);

        updated.position = params.origin / params.viewport;
        updated.velocity = vec2<f32>(cos(theta), sin(theta)) * speed;
        updated.age = 0.0;
        updated.life = p.life;
    } else {
        let dt = max(params.time_delta, 0.0);
        var base = p.position;
        if (params.compound_position != 0u) {
            base = p.position / params.viewport;
        }

        updated.position = base + p.velocity * dt;
        updated.velocity = p.velocity + params.gravity * dt;
        updated.age = p.age + dt;
        updated.life = p.life;
    }

    particles_out[i] = updated;
}
"#;

/// 渲染阶段：每个粒子一个白色点
pub const RENDER_SHADER: &str = r#"
@vertex
fn vs_main(@location(0) position: vec2<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(position, 0.0, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 1.0, 1.0, 1.0);
}
"#;

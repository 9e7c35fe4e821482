//! 着色器编译与管线创建的错误捕获
//!
//! wgpu 默认把校验错误交给未捕获错误回调。这里用 error scope 包住创建过程，
//! 把失败转成带阶段名称的 [`RenderError`]，调用方记录日志后不安装对应管线。

use crate::core::error::{RenderError, RenderResult};

/// 在校验 error scope 中执行 `create`，返回其结果或捕获到的错误信息
pub fn with_validation_scope<T, F>(device: &wgpu::Device, create: F) -> Result<T, String>
where
    F: FnOnce(&wgpu::Device) -> T,
{
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = create(device);
    match pollster::block_on(device.pop_error_scope()) {
        Some(error) => Err(error.to_string()),
        None => Ok(value),
    }
}

/// 编译 WGSL 着色器
pub fn compile_shader(
    device: &wgpu::Device,
    stage: &str,
    source: &str,
) -> RenderResult<wgpu::ShaderModule> {
    let module = with_validation_scope(device, |device| {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(stage),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        })
    })
    .map_err(|message| RenderError::ShaderCompilation {
        stage: stage.to_string(),
        message,
    })?;

    tracing::info!(target: "render", "[{}] Shader compilation successful.", stage);
    Ok(module)
}

/// 创建管线并捕获链接错误
pub fn link_pipeline<T, F>(device: &wgpu::Device, label: &str, create: F) -> RenderResult<T>
where
    F: FnOnce(&wgpu::Device) -> T,
{
    let pipeline = with_validation_scope(device, create).map_err(|message| {
        RenderError::PipelineCreation {
            label: label.to_string(),
            message,
        }
    })?;

    tracing::info!(target: "render", "[{}] Pipeline linking successful.", label);
    Ok(pipeline)
}

/// 记录失败并降级为 `None`
///
/// 着色器错误不是致命错误：对应阶段不安装，之后的调度/绘制都是空操作。
pub fn installed<T>(result: RenderResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::error!(target: "render", "{}", error);
            None
        }
    }
}

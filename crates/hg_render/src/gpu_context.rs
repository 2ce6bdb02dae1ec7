use std::sync::Arc;

use hg_core::view::{Extent, RendererType, ResetFlags};
use hg_core::StartupError;
use winit::window::Window;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;

pub struct GpuContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub surface_format: wgpu::TextureFormat,
    pub present_modes: Vec<wgpu::PresentMode>,
    pub depth_view: wgpu::TextureView,
    pub adapter_info: wgpu::AdapterInfo,
    pub size: (u32, u32),
}

impl GpuContext {
    pub fn new(
        window: Arc<Window>,
        renderer: RendererType,
        reset: ResetFlags,
    ) -> Result<Self, StartupError> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: backends_for(renderer),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| StartupError::Surface(e.to_string()))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| StartupError::NoAdapter {
            backend: renderer.label().to_string(),
        })?;

        let adapter_info = adapter.get_info();
        log::info!(
            "GPU adapter: {} ({:?})",
            adapter_info.name,
            adapter_info.backend
        );

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("hello_gpu Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            },
            None,
        ))
        .map_err(|e| StartupError::Device(e.to_string()))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| StartupError::Surface("surface reports no formats".to_string()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let present_mode = select_present_mode(reset, &surface_caps.present_modes);
        log::info!("Surface format {surface_format:?}, present mode {present_mode:?}");

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let depth_view = create_depth_view(&device, config.width, config.height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            surface_format,
            present_modes: surface_caps.present_modes,
            depth_view,
            adapter_info,
            size: (size.width, size.height),
        })
    }

    /// Reconfigure the swapchain. A zero-area size is remembered but the
    /// surface keeps its last valid configuration.
    pub fn resize(&mut self, width: u32, height: u32, reset: ResetFlags) {
        self.size = (width, height);
        self.config.present_mode = select_present_mode(reset, &self.present_modes);
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, width, height);
    }

    pub fn extent(&self) -> Extent {
        Extent::new(self.size.0, self.size.1)
    }

    pub fn is_srgb(&self) -> bool {
        self.surface_format.is_srgb()
    }

    pub fn begin_frame(&self) -> Option<(wgpu::SurfaceTexture, wgpu::TextureView)> {
        let output = match self.surface.get_current_texture() {
            Ok(tex) => tex,
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return None;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory");
                return None;
            }
            Err(e) => {
                log::warn!("Surface error: {:?}", e);
                return None;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        Some((output, view))
    }
}

pub fn backends_for(renderer: RendererType) -> wgpu::Backends {
    match renderer {
        RendererType::Auto => wgpu::Backends::all(),
        RendererType::Vulkan => wgpu::Backends::VULKAN,
        RendererType::Dx12 => wgpu::Backends::DX12,
        RendererType::Metal => wgpu::Backends::METAL,
        RendererType::Gl => wgpu::Backends::GL,
    }
}

/// FIFO when vsync is requested. Otherwise the lowest-latency mode the
/// surface offers, falling back to FIFO, which every surface supports.
pub fn select_present_mode(
    reset: ResetFlags,
    available: &[wgpu::PresentMode],
) -> wgpu::PresentMode {
    if reset.contains(ResetFlags::VSYNC) {
        return wgpu::PresentMode::Fifo;
    }
    [wgpu::PresentMode::Immediate, wgpu::PresentMode::Mailbox]
        .into_iter()
        .find(|mode| available.contains(mode))
        .unwrap_or(wgpu::PresentMode::Fifo)
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Backbuffer Depth"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

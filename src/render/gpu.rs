use crate::constants::{GPU_CLEAR_COLOR, GPU_MAX_FRAME_LATENCY, PLASMA_UNIFORM_BYTES};
use crate::core::{FxError, RenderState, Scene, Surface, SurfaceSize};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PlasmaUniforms {
    resolution: [f32; 2],
    time: f32,
    hue: f32,
    pointer: [f32; 2],
    presence: f32,
    pulse: f32,
    color: [f32; 4],
    speed: f32,
    scale: f32,
    _pad: [f32; 2],
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl GpuState {
    pub async fn new(canvas: web::HtmlCanvasElement, size: SurfaceSize) -> anyhow::Result<Self> {
        let width = size.width.max(1);
        let height = size.height.max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!("request_device error: {:?}", e))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: GPU_MAX_FRAME_LATENCY,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("plasma_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::core::PLASMA_WGSL.into()),
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("plasma_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("plasma_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("plasma_pipeline"),
            layout: Some(&pl),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_fullscreen"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_plasma"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("plasma_uniforms"),
            size: PLASMA_UNIFORM_BYTES,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("plasma_bg"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            uniform_buffer,
            bind_group,
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.config.width || height != self.config.height {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Draws the plasma scene; any other scene leaves the canvas untouched.
    pub fn render(&mut self, state: &RenderState) -> Result<(), FxError> {
        let Scene::Shader { color, uniforms } = &state.scene else {
            return Ok(());
        };
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Err(FxError::backend("surface lost, reconfigured"));
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(FxError::unavailable("out of GPU memory"));
            }
            Err(e) => return Err(FxError::backend(format!("{:?}", e))),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let u = PlasmaUniforms {
            resolution: [self.config.width as f32, self.config.height as f32],
            time: state.elapsed,
            hue: uniforms.hue,
            pointer: uniforms.pointer_uv.clamp(glam::Vec2::ZERO, glam::Vec2::ONE).to_array(),
            presence: uniforms.pointer_presence.clamp(0.0, 1.0),
            pulse: uniforms.pulse.clamp(0.0, 1.0),
            color: color.to_array(),
            speed: uniforms.speed,
            scale: uniforms.scale,
            _pad: [0.0; 2],
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&u));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let [r, g, b, a] = GPU_CLEAR_COLOR;
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("plasma_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.bind_group, &[]);
            rpass.draw(0..3, 0..1);
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

enum GpuSlot {
    Pending,
    Ready(GpuState),
    Failed(String),
    Released,
}

/// WebGPU canvas. Device setup is asynchronous: draws are no-ops while it is
/// pending, and a failed setup reports the surface unavailable on the next draw.
pub struct GpuSurface {
    canvas: web::HtmlCanvasElement,
    slot: Rc<RefCell<GpuSlot>>,
    size: SurfaceSize,
    released: bool,
}

impl GpuSurface {
    pub fn new(canvas: web::HtmlCanvasElement, size: SurfaceSize) -> Self {
        let slot = Rc::new(RefCell::new(GpuSlot::Pending));
        let slot_init = slot.clone();
        let canvas_init = canvas.clone();
        spawn_local(async move {
            let result = GpuState::new(canvas_init, size).await;
            let mut slot = slot_init.borrow_mut();
            if matches!(*slot, GpuSlot::Released) {
                return;
            }
            *slot = match result {
                Ok(gpu) => {
                    log::info!("[surface] webgpu ready");
                    GpuSlot::Ready(gpu)
                }
                Err(e) => {
                    log::error!("WebGPU init error: {:?}", e);
                    GpuSlot::Failed(e.to_string())
                }
            };
        });
        Self {
            canvas,
            slot,
            size,
            released: false,
        }
    }
}

impl Surface for GpuSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn resize(&mut self, size: SurfaceSize) {
        if self.released {
            return;
        }
        self.size = size;
        crate::dom::sync_canvas_backing_size(&self.canvas, size);
    }

    fn draw(&mut self, state: &RenderState) -> Result<(), FxError> {
        if self.released {
            return Ok(());
        }
        match &mut *self.slot.borrow_mut() {
            GpuSlot::Ready(gpu) => {
                gpu.resize_if_needed(self.size.width, self.size.height);
                gpu.render(state)
            }
            GpuSlot::Failed(reason) => Err(FxError::unavailable(reason.clone())),
            GpuSlot::Pending | GpuSlot::Released => Ok(()),
        }
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        // dropping the state frees the device, buffers and pipeline
        *self.slot.borrow_mut() = GpuSlot::Released;
        self.canvas.remove();
    }

    fn is_released(&self) -> bool {
        self.released
    }
}

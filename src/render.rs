use crate::assets::TextureStore;
use crate::constants::{CLEAR_COLOR, INITIAL_QUAD_CAPACITY, QUAD_VERTEX_COUNT, WHITE_TEXEL};
use fnv::FnvHashMap;
use stage_core::{Camera, QuadDraw, TextureHandle};
use web_sys as web;

mod helpers;
mod quads;

use quads::{
    create_instance_buffer, create_quad_resources, texture_runs, QuadInstance, QuadResources,
};

pub static STAGE_WGSL: &str = include_str!("../shaders/stage.wgsl");

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    quads: QuadResources,
    white: wgpu::BindGroup,
    textures: FnvHashMap<TextureHandle, wgpu::BindGroup>,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    instances: Vec<QuadInstance>,
    width: u32,
    height: u32,
    clear_color: wgpu::Color,
}

impl GpuState {
    pub async fn new(canvas: &web::HtmlCanvasElement, camera: &Camera) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Default limits: older WebGPU implementations reject unknown fields
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = helpers::pick_surface_format(&caps.formats)
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
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let quads = create_quad_resources(&device, format);
        let (_white_tex, white_view) =
            helpers::create_rgba_texture(&device, &queue, "white_tex", 1, 1, &WHITE_TEXEL);
        let white = helpers::texture_bind_group(
            &device,
            &quads.texture_bgl,
            &white_view,
            &quads.sampler,
            "white_bg",
        );
        let instance_buffer = create_instance_buffer(&device, INITIAL_QUAD_CAPACITY);
        let [r, g, b, a] = CLEAR_COLOR;

        let mut state = Self {
            surface,
            device,
            queue,
            config,
            quads,
            white,
            textures: FnvHashMap::default(),
            instance_buffer,
            instance_capacity: INITIAL_QUAD_CAPACITY,
            instances: Vec::with_capacity(INITIAL_QUAD_CAPACITY),
            width,
            height,
            clear_color: wgpu::Color { r, g, b, a },
        };
        state.set_camera(camera);
        log::info!("[render] surface {}x{} {:?}", width, height, format);
        Ok(state)
    }

    pub fn set_camera(&mut self, camera: &Camera) {
        let view_proj = camera.view_proj().to_cols_array_2d();
        self.queue.write_buffer(
            &self.quads.camera_buffer,
            0,
            bytemuck::cast_slice(&view_proj),
        );
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.reconfigure();
        }
    }

    pub fn reconfigure(&mut self) {
        self.config.width = self.width;
        self.config.height = self.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Upload pixels for any handle seen for the first time.
    fn upload_new_textures(&mut self, draws: &[QuadDraw], store: &TextureStore) {
        for handle in draws.iter().filter_map(|d| d.texture) {
            if self.textures.contains_key(&handle) {
                continue;
            }
            let Some(decoded) = store.take(handle) else {
                continue;
            };
            let label = format!("texture_{}", handle.id());
            let (_tex, view) = helpers::create_rgba_texture(
                &self.device,
                &self.queue,
                &label,
                decoded.width,
                decoded.height,
                &decoded.rgba,
            );
            let bg = helpers::texture_bind_group(
                &self.device,
                &self.quads.texture_bgl,
                &view,
                &self.quads.sampler,
                &label,
            );
            self.textures.insert(handle, bg);
        }
    }

    fn write_instances(&mut self, draws: &[QuadDraw]) {
        if draws.len() > self.instance_capacity {
            self.instance_capacity = draws.len().next_power_of_two();
            self.instance_buffer = create_instance_buffer(&self.device, self.instance_capacity);
            log::debug!("[render] instance capacity {}", self.instance_capacity);
        }
        self.instances.clear();
        self.instances.extend(draws.iter().map(QuadInstance::from));
        self.queue
            .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&self.instances));
    }

    /// Draw `draws` in order; callers sort them back to front.
    pub fn render(
        &mut self,
        draws: &[QuadDraw],
        store: &TextureStore,
    ) -> Result<(), wgpu::SurfaceError> {
        self.upload_new_textures(draws, store);
        self.write_instances(draws);
        let runs = texture_runs(draws, |t| t.filter(|h| self.textures.contains_key(h)));

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("stage_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if !draws.is_empty() {
                rpass.set_pipeline(&self.quads.pipeline);
                rpass.set_bind_group(0, &self.quads.camera_bind_group, &[]);
                rpass.set_vertex_buffer(0, self.instance_buffer.slice(..));
                for (texture, range) in runs {
                    let bg = texture
                        .and_then(|h| self.textures.get(&h))
                        .unwrap_or(&self.white);
                    rpass.set_bind_group(1, bg, &[]);
                    rpass.draw(0..QUAD_VERTEX_COUNT, range);
                }
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

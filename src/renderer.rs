use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::{Mat4, Vec3};
use wgpu::{CompositeAlphaMode, InstanceDescriptor, SurfaceTarget};

use crate::error::{Error, Result};
use crate::fold::{FoldParams, FoldUniforms};
use crate::page::Page;
use crate::pipeline::{create_curl_pipeline, create_depth_texture};
use crate::texture::TextureManager;
use crate::Color;

/// How long a pointer press animates toward the touch point.
const PRESS_TWEEN_DURATION: Duration = Duration::from_millis(400);

/// Linear tween from one pointer position to another, driven by the caller's
/// render cadence: each frame samples the current position, nothing runs in
/// the background.
struct PointerTween {
    from: (f32, f32),
    to: (f32, f32),
    started_at: Instant,
    duration: Duration,
}

impl PointerTween {
    fn new(from: (f32, f32), to: (f32, f32), duration: Duration) -> Self {
        Self {
            from,
            to,
            started_at: Instant::now(),
            duration,
        }
    }

    fn sample(&self, now: Instant) -> (f32, f32) {
        let t = tween_progress(now.saturating_duration_since(self.started_at), self.duration);
        (
            self.from.0 + (self.to.0 - self.from.0) * t,
            self.from.1 + (self.to.1 - self.from.1) * t,
        )
    }

    fn finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) >= self.duration
    }
}

fn tween_progress(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
}

/// The renderer owns the wgpu surface, device and queue, the curl pipeline,
/// and at most one [`Page`].
///
/// Typical use: construct with the window, load a texture through
/// [`Renderer::texture_manager`], attach it with
/// [`Renderer::set_page_texture`], then feed pointer positions with
/// [`Renderer::set_pointer`] and call [`Renderer::render`] once per frame.
pub struct Renderer<'a> {
    /// Size of the window in physical pixels.
    physical_size: (u32, u32),

    surface: wgpu::Surface<'a>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,

    pipeline: wgpu::RenderPipeline,
    uniform_bind_group_layout: wgpu::BindGroupLayout,
    texture_bind_group_layout: wgpu::BindGroupLayout,
    depth_texture_view: wgpu::TextureView,

    texture_manager: TextureManager,
    fold_params: FoldParams,
    clear_color: Color,

    page: Option<Page>,
    page_texture_id: Option<u64>,

    /// Latest pointer sample in normalized device coordinates. Input events
    /// overwrite it between frames; only the most recent value matters.
    pointer: (f32, f32),
    tween: Option<PointerTween>,
}

impl Renderer<'_> {
    pub async fn new(
        window: impl Into<SurfaceTarget<'static>>,
        physical_size: (u32, u32),
    ) -> Result<Self> {
        let instance = wgpu::Instance::new(&InstanceDescriptor::default());
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            })
            .await?;

        tracing::info!(adapter = ?adapter.get_info().name, "graphics device ready");

        let swapchain_format = wgpu::TextureFormat::Bgra8UnormSrgb;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: swapchain_format,
            width: physical_size.0,
            height: physical_size.1,
            present_mode: wgpu::PresentMode::Fifo,
            desired_maximum_frame_latency: 2,
            alpha_mode: CompositeAlphaMode::Opaque,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let (uniform_bind_group_layout, texture_bind_group_layout, pipeline) =
            create_curl_pipeline(&device, &config);

        let depth_texture = create_depth_texture(&device, physical_size);
        let depth_texture_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let device = Arc::new(device);
        let queue = Arc::new(queue);
        let texture_manager = TextureManager::new(device.clone(), queue.clone());

        Ok(Self {
            physical_size,
            surface,
            device,
            queue,
            config,
            pipeline,
            uniform_bind_group_layout,
            texture_bind_group_layout,
            depth_texture_view,
            texture_manager,
            fold_params: FoldParams::default(),
            clear_color: Color::WHITE,
            page: None,
            page_texture_id: None,
            // Resting pose: pointer parked at the right edge, page flat.
            pointer: (1.0, 0.0),
            tween: None,
        })
    }

    pub fn texture_manager(&self) -> TextureManager {
        self.texture_manager.clone()
    }

    /// Attaches the page, textured with a previously loaded texture.
    ///
    /// The page spans 1.0 model unit horizontally; its height follows the
    /// window's aspect ratio and is recomputed on resize.
    pub fn set_page_texture(&mut self, texture_id: u64) -> Result<()> {
        self.page_texture_id = Some(texture_id);
        self.rebuild_page()
    }

    /// Replaces the curl tuning constants and rebuilds the page with them.
    pub fn set_fold_params(&mut self, params: FoldParams) -> Result<()> {
        self.fold_params = params;
        if self.page_texture_id.is_some() {
            self.rebuild_page()?;
        }
        Ok(())
    }

    pub fn fold_params(&self) -> FoldParams {
        self.fold_params
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    /// Sets the pointer position, both coordinates clamped to `[-1, 1]`.
    /// Cancels a running press tween; direct movement wins.
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.tween = None;
        self.pointer = (x.clamp(-1.0, 1.0), y.clamp(-1.0, 1.0));
    }

    /// Animates the pointer from its current position to `(x, y)` over a
    /// short press tween, the way a touch-down snaps the curl to the finger.
    pub fn press_pointer(&mut self, x: f32, y: f32) {
        let to = (x.clamp(-1.0, 1.0), y.clamp(-1.0, 1.0));
        self.tween = Some(PointerTween::new(self.pointer, to, PRESS_TWEEN_DURATION));
    }

    /// True while a press tween is still running; callers keep requesting
    /// redraws until it settles.
    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    pub fn pointer(&self) -> (f32, f32) {
        self.pointer
    }

    pub fn size(&self) -> (u32, u32) {
        self.physical_size
    }

    pub fn resize(&mut self, new_physical_size: (u32, u32)) -> Result<()> {
        if new_physical_size.0 == 0 || new_physical_size.1 == 0 {
            return Ok(());
        }
        self.physical_size = new_physical_size;
        self.config.width = new_physical_size.0;
        self.config.height = new_physical_size.1;
        self.surface.configure(&self.device, &self.config);

        let depth_texture = create_depth_texture(&self.device, new_physical_size);
        self.depth_texture_view =
            depth_texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Page height follows the aspect ratio, so the mesh must be rebuilt.
        if self.page_texture_id.is_some() {
            self.rebuild_page()?;
        }
        Ok(())
    }

    /// Renders one frame with the current pointer position.
    ///
    /// Returns the fold state that was handed to the shader, or `None` when
    /// no page is attached (the frame is still cleared and presented).
    pub fn render(&mut self) -> Result<Option<FoldUniforms>, wgpu::SurfaceError> {
        let pointer = self.tick_tween();

        let output = self.surface.get_current_texture()?;
        let output_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Curl Command Encoder"),
            });

        let fold = {
            let [r, g, b, a] = self.clear_color.normalize();
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Curl Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &output_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(page) = self.page.as_mut() {
                render_pass.set_pipeline(&self.pipeline);
                // The matrices are composed locally every frame; there is no
                // shared matrix state to leak between draws.
                let mvp = Self::model_view_projection(self.config.width, self.config.height);
                Some(page.draw(&self.queue, &mut render_pass, mvp, pointer))
            } else {
                None
            }
        };

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(fold)
    }

    /// Orthographic projection spanning `[-1, 1]` horizontally and
    /// `[-aspect, aspect]` vertically, a unit camera on the z axis, and a
    /// 2x model scale so the page fills the view.
    fn model_view_projection(width: u32, height: u32) -> Mat4 {
        let aspect = height as f32 / width.max(1) as f32;
        let projection = Mat4::orthographic_rh(-1.0, 1.0, -aspect, aspect, -10.0, 10.0);
        let view = Mat4::look_at_rh(Vec3::Z, Vec3::ZERO, Vec3::Y);
        let model = Mat4::from_scale(Vec3::new(2.0, 2.0, 1.0));
        projection * view * model
    }

    fn tick_tween(&mut self) -> (f32, f32) {
        if let Some(tween) = &self.tween {
            let now = Instant::now();
            self.pointer = tween.sample(now);
            if tween.finished(now) {
                self.tween = None;
            }
        }
        self.pointer
    }

    fn rebuild_page(&mut self) -> Result<()> {
        let texture_id = self.page_texture_id.ok_or(Error::NoPage)?;
        let texture_bind_group = self
            .texture_manager
            .create_bind_group(&self.texture_bind_group_layout, texture_id)?;

        let width = 1.0;
        let height = self.physical_size.1 as f32 / self.physical_size.0.max(1) as f32;
        self.page = Some(Page::new(
            &self.device,
            &self.uniform_bind_group_layout,
            texture_bind_group,
            width,
            height,
            self.fold_params,
        )?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tween_progress_is_linear_and_clamped() {
        let duration = Duration::from_millis(400);
        assert_eq!(tween_progress(Duration::ZERO, duration), 0.0);
        assert_eq!(tween_progress(Duration::from_millis(100), duration), 0.25);
        assert_eq!(tween_progress(Duration::from_millis(400), duration), 1.0);
        assert_eq!(tween_progress(Duration::from_millis(900), duration), 1.0);
        assert_eq!(tween_progress(Duration::from_millis(10), Duration::ZERO), 1.0);
    }

    #[test]
    fn tween_samples_between_its_endpoints() {
        let tween = PointerTween::new((0.0, 0.0), (1.0, -1.0), Duration::from_millis(400));
        let halfway = tween.sample(tween.started_at + Duration::from_millis(200));
        assert!((halfway.0 - 0.5).abs() < 1e-6);
        assert!((halfway.1 + 0.5).abs() < 1e-6);
        assert!(tween.finished(tween.started_at + Duration::from_millis(400)));
    }
}

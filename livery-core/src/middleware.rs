//! Tower middleware running theme resolution around an inner service.
//!
//! This module provides a layer that, per request:
//! - creates a fresh [`ActiveTheme`] on the registry default
//! - resolves the theme from the cookie or device detection (main requests
//!   only)
//! - exposes the [`ActiveTheme`] and [`RequestKind`] as request extensions
//! - appends the theme cookie to the response when the resolved theme is
//!   still active

use std::{
    fmt,
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use axum::http::{Request, Response};
use livery_config::LiveryConfig;
use tower::{Layer, Service};
use tracing::debug;

use crate::{
    context::{ActiveTheme, RequestKind},
    cookie::CookieOptions,
    detection::{self, DeviceDetection},
    error::RegistryError,
    registry::ThemeRegistry,
    resolver::ThemeResolver,
    writer::CookieWriter,
};

struct Shared {
    registry: Arc<ThemeRegistry>,
    resolver: ThemeResolver,
    writer: CookieWriter,
}

/// Layer installing [`ThemeMiddleware`].
#[derive(Clone)]
pub struct ThemeLayer {
    shared: Arc<Shared>,
}

impl ThemeLayer {
    /// Start building a layer over `registry`.
    pub fn builder(registry: ThemeRegistry) -> ThemeLayerBuilder {
        ThemeLayerBuilder {
            registry,
            cookie: None,
            detection: None,
        }
    }

    /// Build the layer from loaded configuration.
    pub fn from_config(config: &LiveryConfig) -> Result<Self, RegistryError> {
        let registry = ThemeRegistry::new(
            config.themes.iter().cloned(),
            config.default_theme.clone(),
        )?;

        let mut builder = Self::builder(registry);
        if let Some(cookie) = &config.cookie {
            builder = builder.cookie(CookieOptions::from(cookie));
        }
        if let Some(detection) =
            detection::from_settings(config.autodetect, config.classifier)
        {
            builder = builder.detection_arc(detection);
        }

        Ok(builder.build())
    }

    /// The shared theme registry.
    pub fn registry(&self) -> &Arc<ThemeRegistry> {
        &self.shared.registry
    }

    /// The theme cookie options, if the cookie is enabled.
    pub fn cookie_options(&self) -> Option<&Arc<CookieOptions>> {
        self.shared.resolver.cookie()
    }
}

impl fmt::Debug for ThemeLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeLayer")
            .field("registry", &self.shared.registry)
            .field("resolver", &self.shared.resolver)
            .finish()
    }
}

/// Builder returned by [`ThemeLayer::builder`].
pub struct ThemeLayerBuilder {
    registry: ThemeRegistry,
    cookie: Option<CookieOptions>,
    detection: Option<Arc<dyn DeviceDetection>>,
}

impl ThemeLayerBuilder {
    /// Read and persist the theme in this cookie. Without it neither the
    /// cookie lookup nor the cookie write happens.
    pub fn cookie(mut self, options: CookieOptions) -> Self {
        self.cookie = Some(options);
        self
    }

    /// Auto-detect a theme when the request carries no theme cookie.
    pub fn detection<D>(self, detection: D) -> Self
    where
        D: DeviceDetection + 'static,
    {
        self.detection_arc(Arc::new(detection))
    }

    /// Like [`ThemeLayerBuilder::detection`] for a shared strategy.
    pub fn detection_arc(mut self, detection: Arc<dyn DeviceDetection>) -> Self {
        self.detection = Some(detection);
        self
    }

    /// Finish the layer.
    pub fn build(self) -> ThemeLayer {
        let cookie = self.cookie.map(Arc::new);
        ThemeLayer {
            shared: Arc::new(Shared {
                registry: Arc::new(self.registry),
                resolver: ThemeResolver::new(cookie.clone(), self.detection),
                writer: CookieWriter::new(cookie),
            }),
        }
    }
}

impl fmt::Debug for ThemeLayerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeLayerBuilder")
            .field("registry", &self.registry)
            .field("cookie", &self.cookie)
            .field("detection", &self.detection.is_some())
            .finish()
    }
}

impl<S> Layer<S> for ThemeLayer {
    type Service = ThemeMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        debug!(
            themes = ?self.shared.registry.themes(),
            default = self.shared.registry.default_theme(),
            "installing theme middleware layer"
        );
        ThemeMiddleware {
            inner,
            shared: self.shared.clone(),
        }
    }
}

/// Theme resolution middleware
#[derive(Clone)]
pub struct ThemeMiddleware<S> {
    inner: S,
    shared: Arc<Shared>,
}

impl<S: fmt::Debug> fmt::Debug for ThemeMiddleware<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeMiddleware")
            .field("inner", &self.inner)
            .field("registry", &self.shared.registry)
            .finish()
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for ThemeMiddleware<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>
        + Clone
        + Send
        + 'static,
    S::Future: Send + 'static,
    ReqBody: Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = Pin<
        Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut Context<'_>,
    ) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let kind = RequestKind::of(&req);
        // Forwarded requests keep the theme of the request that spawned them.
        let active = req
            .extensions()
            .get::<ActiveTheme>()
            .filter(|_| !kind.is_main())
            .cloned()
            .unwrap_or_else(|| ActiveTheme::new(self.shared.registry.clone()));
        let resolution =
            self.shared.resolver.resolve(kind, req.headers(), &active);

        req.extensions_mut().insert(kind);
        req.extensions_mut().insert(active.clone());

        // Clone the service and shared state for use in the async block
        let mut inner = self.inner.clone();
        let shared = self.shared.clone();

        Box::pin(async move {
            let mut response = inner.call(req).await?;

            shared.writer.write(
                kind,
                &resolution,
                &active,
                response.headers_mut(),
            );

            Ok(response)
        })
    }
}

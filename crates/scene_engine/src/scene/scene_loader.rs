//! Scene loading pipeline
//!
//! Turns a [`SceneDocument`] into a fully started [`LoadedScene`]:
//! environment, lights, camera, objects, then the audio listener, then
//! `on_start` on everything, camera first. Every asynchronous load finishes
//! before any `on_start` runs, so scripts may assume every sibling object is
//! already in the graph. Sounds requested from `on_start` are loaded before
//! the scene is handed back.
//!
//! Decorative pieces (skybox, a light, a texture, a script) degrade with a
//! log line. Structural ones (the document itself, a model, a geometry the
//! engine does not know) fail the load.

use super::descriptor::{
    CameraDescriptor, EnvironmentDescriptor, LightDescriptor, MaterialDescriptor, ObjectDescriptor,
    SceneDocument,
};
use super::{Background, LoadedScene, NodeKind, SceneError, SceneGraph};
use crate::assets::AssetLoader;
use crate::audio::AudioManager;
use crate::config::from_str_for;
use crate::core::Services;
use crate::events::EventBus;
use crate::foundation::math::Vec3;
use crate::object::components::MeshRenderer;
use crate::object::GameObject;
use crate::render::camera::{DEFAULT_FAR, DEFAULT_FOV, DEFAULT_NEAR, DEFAULT_ORTHO_SIZE};
use crate::render::{Color, Geometry, GeometryKind, Light, LightKind, Material, Mesh, Projection};
use crate::scripts::{load_scripts, ScriptRegistry};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Name of the camera object every scene gets
pub const CAMERA_NAME: &str = "MainCamera";

/// Builds scenes from documents
#[derive(Clone)]
pub struct SceneLoader {
    assets: AssetLoader,
    scripts: Rc<ScriptRegistry>,
    services: Services,
    aspect: f32,
}

impl SceneLoader {
    /// Loader reading through `assets`, resolving scripts from `scripts`,
    /// building cameras for a viewport of the given aspect ratio.
    ///
    /// Objects share a fresh event bus and an audio manager over `assets`.
    pub fn new(assets: AssetLoader, scripts: Rc<ScriptRegistry>, aspect: f32) -> Self {
        let services = Services::new(Rc::new(EventBus::new()), Rc::new(AudioManager::new(assets.clone())));
        Self { assets, scripts, services, aspect }
    }

    /// Hand objects these services instead of the loader's own
    pub fn with_services(mut self, services: Services) -> Self {
        self.services = services;
        self
    }

    /// Services every built object receives
    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Asset pipeline used for documents, models and textures
    pub fn assets(&self) -> &AssetLoader {
        &self.assets
    }

    /// Viewport width / height used for new cameras
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Fetch and parse a scene document
    pub async fn fetch(&self, locator: &str) -> Result<SceneDocument, SceneError> {
        let text = self
            .assets
            .load_text(locator)
            .await
            .map_err(|source| SceneError::ConfigFetch { locator: locator.to_string(), source })?;
        from_str_for(locator, &text).map_err(|source| SceneError::ConfigParse { locator: locator.to_string(), source })
    }

    /// Build and start every part of a scene
    pub async fn load(&self, document: &SceneDocument) -> Result<LoadedScene, SceneError> {
        let mut graph = SceneGraph::new();

        graph.background = self.load_environment(&document.scene).await;
        load_lights(&mut graph, &document.lights);
        let camera = self.build_camera(&mut graph, &document.camera);
        let camera_key = camera.transform();

        let mut game_objects = Vec::with_capacity(document.objects.len() + 1);
        game_objects.push(camera);
        for descriptor in &document.objects {
            let object = self.build_object(&mut graph, descriptor).await?;
            game_objects.push(object);
        }

        self.services.audio.init(camera_key);
        for object in &mut game_objects {
            object.on_start(&mut graph);
        }
        if self.services.audio.has_pending() {
            let sounds = self.services.audio.flush().await;
            log::debug!("Loaded {} sound(s) requested at start", sounds);
        }

        log::debug!(
            "Scene built: {} objects, {} attached nodes",
            game_objects.len(),
            graph.attached_count()
        );
        Ok(LoadedScene { graph, camera: camera_key, game_objects })
    }

    async fn load_environment(&self, environment: &EnvironmentDescriptor) -> Background {
        let color = Background::Color(environment.background.unwrap_or(Color::BACKGROUND));
        let Some(faces) = &environment.skybox else {
            return color;
        };
        match self.assets.load_cubemap(faces).await {
            Ok(cubemap) => Background::Cubemap(cubemap),
            Err(e) => {
                log::error!("Failed to load skybox, falling back to color: {}", e);
                color
            }
        }
    }

    fn build_camera(&self, graph: &mut SceneGraph, descriptor: &CameraDescriptor) -> GameObject {
        let projection = camera_projection(descriptor, self.aspect);
        let node = graph.create(CAMERA_NAME, NodeKind::Camera(projection));
        if let Some(n) = graph.get_mut(node) {
            n.transform.position = descriptor.position.into();
        }
        let mut camera = GameObject::with_transform(CAMERA_NAME, node);
        camera.set_services(self.services.clone());
        self.attach_scripts(&mut camera, &descriptor.scripts);
        graph.add_to_root(node);
        camera
    }

    async fn build_object(&self, graph: &mut SceneGraph, descriptor: &ObjectDescriptor) -> Result<GameObject, SceneError> {
        let mut object = GameObject::new(descriptor.name.clone(), graph);
        object.set_services(self.services.clone());
        if let (Some(position), Some(node)) = (descriptor.position, graph.get_mut(object.transform())) {
            node.transform.position = position.into();
        }

        if let Some(locator) = &descriptor.model {
            let model = self.assets.load_model(locator).await?;
            let node = graph.create(descriptor.name.clone(), NodeKind::Model(model));
            object.adopt_transform(graph, node);
        } else if let Some(geometry) = &descriptor.geometry {
            let kind = GeometryKind::from_type_name(&geometry.kind).ok_or_else(|| {
                SceneError::InvalidConfig(format!(
                    "unknown geometry type {:?} on object \"{}\"",
                    geometry.kind, descriptor.name
                ))
            })?;
            let geometry = Geometry {
                kind,
                width: dimension(geometry.width, "width", &descriptor.name)?,
                height: dimension(geometry.height, "height", &descriptor.name)?,
                depth: dimension(geometry.depth, "depth", &descriptor.name)?,
            };
            let material = self.build_material(descriptor.material.as_ref()).await;
            object.add(MeshRenderer::new(Mesh::new(geometry, material)));
        }

        self.attach_scripts(&mut object, &descriptor.scripts);
        graph.add_to_root(object.transform());
        Ok(object)
    }

    async fn build_material(&self, descriptor: Option<&MaterialDescriptor>) -> Material {
        let Some(descriptor) = descriptor else {
            return Material::missing();
        };
        let mut maps = BTreeMap::new();
        for (key, locator) in descriptor.texture_maps() {
            match self.assets.load_texture(locator).await {
                Ok(mut texture) => {
                    if let Some(repeat) = descriptor.repeat {
                        texture.set_repeat(repeat.x.unwrap_or(1.0), repeat.y.unwrap_or(1.0));
                    }
                    maps.insert(key.to_string(), texture);
                }
                Err(e) => log::warn!("Texture {} for {} skipped: {}", locator, key, e),
            }
        }
        Material {
            kind: descriptor.kind.clone().unwrap_or_else(|| Material::DEFAULT_KIND.to_string()),
            color: descriptor.color,
            maps,
            params: descriptor
                .plain_params()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        }
    }

    fn attach_scripts(&self, object: &mut GameObject, scripts: &[serde_json::Value]) {
        for component in load_scripts(&self.scripts, scripts) {
            object.add_component(component);
        }
    }
}

fn load_lights(graph: &mut SceneGraph, lights: &[serde_json::Value]) {
    for entry in lights {
        let descriptor = match LightDescriptor::from_value(entry) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                log::warn!("Invalid light skipped: {}", e);
                continue;
            }
        };
        let Some(kind) = LightKind::from_type_name(&descriptor.kind) else {
            log::warn!("Invalid light type: {}", descriptor.kind);
            continue;
        };
        let light = Light {
            kind,
            color: descriptor.color.unwrap_or(Color::WHITE),
            intensity: descriptor.intensity.unwrap_or(1.0),
        };
        let node = graph.create(descriptor.kind.clone(), NodeKind::Light(light));
        if let (Some(position), Some(n)) = (descriptor.position, graph.get_mut(node)) {
            n.transform.position = Vec3::from(position);
        }
        graph.add_to_root(node);
    }
}

fn camera_projection(descriptor: &CameraDescriptor, aspect: f32) -> Projection {
    let near = descriptor.near.unwrap_or(DEFAULT_NEAR);
    let far = descriptor.far.unwrap_or(DEFAULT_FAR);
    match descriptor.kind.as_deref() {
        None | Some("perspective" | "PerspectiveCamera") => Projection::Perspective {
            fov: descriptor.fov.unwrap_or(DEFAULT_FOV),
            aspect,
            near,
            far,
        },
        Some("orthographic" | "OrthographicCamera") => Projection::orthographic(
            descriptor.size.unwrap_or(DEFAULT_ORTHO_SIZE),
            aspect,
            descriptor.zoom.unwrap_or(1.0),
            near,
            far,
        ),
        Some(other) => {
            log::warn!("Unknown camera type {:?}; using the default perspective camera", other);
            Projection::default_perspective(aspect)
        }
    }
}

fn dimension(value: Option<f32>, axis: &str, object: &str) -> Result<f32, SceneError> {
    match value {
        None => Ok(1.0),
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        Some(v) => Err(SceneError::InvalidConfig(format!("{axis} {v} on object \"{object}\" must be positive"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetError, MemoryAssets};
    use crate::render::TextureWrap;
    use crate::audio::ClipState;
    use crate::scripts::{AudioSource, Gravity, Rotator};
    use crate::testing;

    fn loader(assets: MemoryAssets) -> SceneLoader {
        SceneLoader::new(
            AssetLoader::new(Rc::new(assets)),
            Rc::new(ScriptRegistry::with_builtins()),
            2.0,
        )
    }

    fn document(json: &str) -> SceneDocument {
        serde_json::from_str(json).unwrap()
    }

    #[tokio::test]
    async fn test_level_one_builds_camera_then_objects() {
        let assets = testing::level_one_assets();
        let loader = loader(assets);
        let document = loader.fetch(testing::LEVEL_ONE).await.unwrap();

        let scene = loader.load(&document).await.unwrap();

        let names: Vec<_> = scene.game_objects.iter().map(GameObject::name).collect();
        assert_eq!(names, [CAMERA_NAME, "floor", "cube"]);
        assert_eq!(scene.game_objects[0].transform(), scene.camera);
        match &scene.graph.get(scene.camera).unwrap().kind {
            NodeKind::Camera(Projection::Perspective { fov, aspect, near, far }) => {
                assert_eq!((*fov, *aspect, *near, *far), (75.0, 2.0, 0.1, 1000.0));
            }
            other => panic!("unexpected camera {:?}", other),
        }
        let camera_position = scene.graph.get(scene.camera).unwrap().transform.position;
        assert_eq!(camera_position, Vec3::new(0.0, 1.0, 5.0));
        assert!(scene.game_objects[2].get_component::<Gravity>().is_some());

        // started: every renderable swapped its placeholder for a mesh node
        for object in &scene.game_objects[1..] {
            let node = scene.graph.get(object.transform()).unwrap();
            assert!(matches!(node.kind, NodeKind::Mesh(_)));
            assert!(scene.graph.is_attached(object.transform()));
        }
        assert!(scene.graph.find_by_name("PointLight").is_some());
    }

    #[tokio::test]
    async fn test_defaults_when_fields_are_omitted() {
        let scene = loader(MemoryAssets::new())
            .load(&document(
                r#"{
                    "camera": { "type": "orthographic", "position": { "x": 0, "y": 0, "z": 10 } },
                    "lights": [{ "type": "AmbientLight" }, { "type": "LaserLight" }],
                    "objects": [{ "name": "blob", "geometry": { "type": "SphereGeometry" } }]
                }"#,
            ))
            .await
            .unwrap();

        assert_eq!(scene.graph.background, Background::Color(Color::BACKGROUND));
        match &scene.graph.get(scene.camera).unwrap().kind {
            NodeKind::Camera(Projection::Orthographic { left, top, zoom, .. }) => {
                assert_eq!((*left, *top, *zoom), (-10.0, 5.0, 1.0));
            }
            other => panic!("unexpected camera {:?}", other),
        }
        let light = scene.graph.find_by_name("AmbientLight").unwrap();
        match &scene.graph.get(light).unwrap().kind {
            NodeKind::Light(light) => {
                assert_eq!(light.color, Color::WHITE);
                assert_eq!(light.intensity, 1.0);
            }
            other => panic!("unexpected light {:?}", other),
        }
        assert!(scene.graph.find_by_name("LaserLight").is_none());

        let blob = scene.graph.get(scene.game_objects[1].transform()).unwrap();
        match &blob.kind {
            NodeKind::Mesh(mesh) => {
                assert_eq!(mesh.geometry.width, 1.0);
                assert_eq!(mesh.material.color, Some(Color::MISSING));
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_camera_type_falls_back_to_perspective() {
        let scene = loader(MemoryAssets::new())
            .load(&document(r#"{ "camera": { "type": "fisheye", "fov": 10, "position": {} } }"#))
            .await
            .unwrap();
        assert_eq!(
            scene.graph.get(scene.camera).unwrap().kind,
            NodeKind::Camera(Projection::default_perspective(2.0))
        );
    }

    #[tokio::test]
    async fn test_skybox_failure_falls_back_to_color() {
        let assets = MemoryAssets::new();
        let faces: Vec<String> = (0..6).map(|i| format!("sky/{i}.png")).collect();
        for face in &faces {
            assets.insert(face.clone(), testing::png_bytes(2, 2));
        }
        let loader = loader(assets);

        let mut doc = document(r#"{ "scene": { "background": "0x000080" }, "camera": { "position": {} } }"#);
        doc.scene.skybox = Some(faces.clone());
        let scene = loader.load(&doc).await.unwrap();
        assert!(matches!(scene.graph.background, Background::Cubemap(ref c) if c.faces.len() == 6));

        doc.scene.skybox = Some(faces[..4].to_vec());
        let scene = loader.load(&doc).await.unwrap();
        assert_eq!(scene.graph.background, Background::Color(Color(0x00_0080)));
    }

    #[tokio::test]
    async fn test_textures_merged_and_failures_skipped() {
        let assets = MemoryAssets::new();
        assets.insert("tex/wood.png", testing::png_bytes(8, 8));
        let scene = loader(assets)
            .load(&document(
                r#"{
                    "camera": { "position": {} },
                    "objects": [{
                        "name": "crate",
                        "geometry": { "type": "BoxGeometry" },
                        "material": {
                            "type": "MeshPhongMaterial",
                            "map": "tex/wood.png",
                            "bumpMap": "tex/missing.png",
                            "shininess": 30,
                            "repeat": { "y": 3 }
                        }
                    }]
                }"#,
            ))
            .await
            .unwrap();

        let node = scene.graph.get(scene.game_objects[1].transform()).unwrap();
        let NodeKind::Mesh(mesh) = &node.kind else {
            panic!("expected a mesh, got {:?}", node.kind);
        };
        assert_eq!(mesh.material.kind, "MeshPhongMaterial");
        assert_eq!(mesh.material.color, None);
        assert_eq!(mesh.material.maps.len(), 1);
        let texture = &mesh.material.maps["map"];
        assert_eq!(texture.wrap, TextureWrap::Repeat);
        assert_eq!(texture.repeat, (1.0, 3.0));
        assert_eq!(mesh.material.params["shininess"], 30);
    }

    #[tokio::test]
    async fn test_model_adopted_as_transform() {
        let assets = MemoryAssets::new();
        assets.insert_text("models/ship.obj", "v -1 0 -1\nv 1 0 -1\nv 0 1 1\nf 1 2 3\n");
        let scene = loader(assets)
            .load(&document(
                r#"{
                    "camera": { "position": {} },
                    "objects": [{
                        "name": "ship",
                        "position": { "x": 3, "y": 0, "z": 0 },
                        "model": "models/ship.obj",
                        "scripts": [{ "type": "rotator" }]
                    }]
                }"#,
            ))
            .await
            .unwrap();

        let ship = &scene.game_objects[1];
        let node = scene.graph.get(ship.transform()).unwrap();
        assert!(matches!(node.kind, NodeKind::Model(_)));
        assert_eq!(node.name, "ship");
        assert_eq!(node.transform.position, Vec3::new(3.0, 0.0, 0.0));
        assert!(ship.get_component::<Rotator>().is_some());
        assert_eq!(scene.graph.find_by_name("ship"), Some(ship.transform()));
    }

    #[tokio::test]
    async fn test_missing_model_is_fatal() {
        let result = loader(MemoryAssets::new())
            .load(&document(
                r#"{ "camera": { "position": {} }, "objects": [{ "name": "ghost", "model": "models/none.obj" }] }"#,
            ))
            .await;
        assert!(matches!(result, Err(SceneError::Asset(AssetError::NotFound(_)))));
    }

    #[tokio::test]
    async fn test_unknown_geometry_is_invalid_config() {
        let result = loader(MemoryAssets::new())
            .load(&document(
                r#"{ "camera": { "position": {} }, "objects": [{ "name": "k", "geometry": { "type": "KnotGeometry" } }] }"#,
            ))
            .await;
        assert!(matches!(result, Err(SceneError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_bad_scripts_do_not_fail_the_scene() {
        let scene = loader(MemoryAssets::new())
            .load(&document(
                r#"{
                    "camera": { "position": {}, "scripts": [{ "type": "camera-follow", "target": "cube" }, { "source": "alert(1)" }] },
                    "objects": [{ "name": "cube", "scripts": [{ "type": "nope" }, { "type": "rotator" }] }]
                }"#,
            ))
            .await
            .unwrap();
        assert_eq!(scene.game_objects[0].component_count(), 1);
        assert_eq!(scene.game_objects[1].component_count(), 1);
    }

    #[tokio::test]
    async fn test_malformed_entries_skipped_individually() {
        let assets = MemoryAssets::new();
        assets.insert_text(
            "scenes/lenient.json",
            r#"{
                "camera": { "position": {}, "scripts": [{ "type": 5 }] },
                "lights": [
                    { "intensity": 2 },
                    { "type": "PointLight", "color": "red" },
                    { "type": "AmbientLight" }
                ],
                "objects": [{ "name": "o", "scripts": [{ "type": 5 }, { "type": "rotator" }] }]
            }"#,
        );
        let loader = loader(assets);
        let document = loader.fetch("scenes/lenient.json").await.unwrap();
        let scene = loader.load(&document).await.unwrap();

        assert_eq!(scene.game_objects[0].component_count(), 0);
        assert_eq!(scene.game_objects[1].component_count(), 1);
        assert!(scene.game_objects[1].get_component::<Rotator>().is_some());
        assert!(scene.graph.find_by_name("AmbientLight").is_some());
        assert!(scene.graph.find_by_name("PointLight").is_none());
    }

    #[tokio::test]
    async fn test_audio_source_loaded_before_first_frame() {
        let assets = MemoryAssets::new();
        assets.insert("sfx/hum.wav", vec![9]);
        let loader = loader(assets);
        let scene = loader
            .load(&document(
                r#"{
                    "camera": { "position": {} },
                    "objects": [
                        { "name": "radio", "scripts": [{ "type": "audio-source", "src": "sfx/hum.wav", "autoplay": true }] },
                        { "name": "broken", "scripts": [{ "type": "audio-source", "src": "sfx/none.wav" }] }
                    ]
                }"#,
            ))
            .await
            .unwrap();

        assert_eq!(loader.services().audio.listener().map(|l| l.camera), Some(scene.camera));
        assert!(!loader.services().audio.has_pending());
        let radio = scene.game_objects[1].get_component::<AudioSource>().unwrap();
        assert!(radio.clip().unwrap().buffer().is_some());
        let broken = scene.game_objects[2].get_component::<AudioSource>().unwrap();
        assert!(matches!(broken.clip().unwrap().state(), ClipState::Failed(_)));
        assert!(!scene.game_objects[2].is_destroyed());
    }

    #[tokio::test]
    async fn test_objects_share_the_loader_services() {
        let events = Rc::new(EventBus::new());
        let audio = Rc::new(AudioManager::new(AssetLoader::new(Rc::new(MemoryAssets::new()))));
        let loader = loader(MemoryAssets::new()).with_services(Services::new(Rc::clone(&events), audio));
        let scene = loader
            .load(&document(r#"{ "camera": { "position": {} }, "objects": [{ "name": "a" }] }"#))
            .await
            .unwrap();

        for object in &scene.game_objects {
            assert!(Rc::ptr_eq(&object.services().unwrap().events, &events));
        }
    }

    #[tokio::test]
    async fn test_fetch_errors() {
        let assets = MemoryAssets::new();
        assets.insert_text("broken.json", "{ not json");
        assets.insert_text("level.yaml", "camera: {}");
        let loader = loader(assets);

        assert!(matches!(loader.fetch("missing.json").await, Err(SceneError::ConfigFetch { .. })));
        assert!(matches!(loader.fetch("broken.json").await, Err(SceneError::ConfigParse { .. })));
        assert!(matches!(loader.fetch("level.yaml").await, Err(SceneError::ConfigParse { .. })));
    }
}

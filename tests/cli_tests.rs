use clap::Parser;
use glam::Vec3;
use gltf_viewer::cli::{Cli, Command, ViewerArgs};
use gltf_viewer::config::ViewerConfig;
use gltf_viewer::ControllerKind;
use std::path::PathBuf;

fn viewer_args(args: &[&str]) -> ViewerArgs {
    let argv = ["gltf-viewer", "viewer"].iter().chain(args);
    match Cli::try_parse_from(argv).unwrap().command {
        Command::Viewer(args) => args,
        other => panic!("expected viewer command, got {other:?}"),
    }
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn test_viewer_defaults() {
        let config = ViewerConfig::from(viewer_args(&["scene.gltf"]));
        assert_eq!(config.scene_path, PathBuf::from("scene.gltf"));
        assert_eq!((config.width, config.height), (1280, 720));
        assert_eq!(config.controller, ControllerKind::FirstPerson);
        assert!(config.lookat.is_none());
        assert!(!config.is_headless());
    }

    #[test]
    fn test_viewer_all_options() {
        let config = ViewerConfig::from(viewer_args(&[
            "scene.glb",
            "-w",
            "640",
            "-h",
            "480",
            "--lookat",
            "0,0,5,0,0,0,0,1,0",
            "--vs",
            "custom.vs.wgsl",
            "--fs",
            "custom.fs.wgsl",
            "-o",
            "out.png",
            "--controller",
            "trackball",
        ]));

        assert_eq!((config.width, config.height), (640, 480));
        assert!((config.aspect_ratio() - 4.0 / 3.0).abs() < 1e-6);
        assert_eq!(config.output, Some(PathBuf::from("out.png")));
        assert!(config.is_headless());
        assert_eq!(config.vertex_shader, Some(PathBuf::from("custom.vs.wgsl")));
        assert_eq!(config.fragment_shader, Some(PathBuf::from("custom.fs.wgsl")));
        assert_eq!(config.controller, ControllerKind::Trackball);

        let camera = config.lookat.unwrap();
        assert_eq!(camera.eye(), Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(camera.up(), Vec3::Y);
    }

    #[test]
    fn test_lookat_accepts_negative_values() {
        let args = viewer_args(&["scene.gltf", "--lookat", "-1,-2,-3,0,0,0,0,1,0"]);
        assert_eq!(args.lookat.unwrap().eye(), Vec3::new(-1.0, -2.0, -3.0));
    }

    #[test]
    fn test_lookat_rejects_wrong_count() {
        let argv = ["gltf-viewer", "viewer", "scene.gltf", "--lookat", "1,2,3,4"];
        let error = Cli::try_parse_from(argv).unwrap_err();
        assert!(error.to_string().contains("expected 9 numbers, got 4"));
    }

    #[test]
    fn test_lookat_rejects_empty_field() {
        let argv = ["gltf-viewer", "viewer", "scene.gltf", "--lookat", "0,0,5,0,,0,0,0,1,0"];
        let error = Cli::try_parse_from(argv).unwrap_err();
        assert!(error.to_string().contains("value 5 is empty"));
    }

    #[test]
    fn test_lookat_rejects_parallel_up() {
        let argv = ["gltf-viewer", "viewer", "scene.gltf", "--lookat", "0,0,0,0,5,0,0,1,0"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_zero_width_is_rejected() {
        let argv = ["gltf-viewer", "viewer", "scene.gltf", "-w", "0"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_file_is_required() {
        assert!(Cli::try_parse_from(["gltf-viewer", "viewer"]).is_err());
    }

    #[test]
    fn test_info_command() {
        let cli = Cli::try_parse_from(["gltf-viewer", "info"]).unwrap();
        assert!(matches!(cli.command, Command::Info));
    }
}

pub mod frame_ring;

pub mod attendance_stats;

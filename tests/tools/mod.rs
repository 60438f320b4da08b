pub mod mock_port;

pub mod wiimote;

/// Virtual-host discovery collaborator:
pub mod vhosts;

mod remap;
